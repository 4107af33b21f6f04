use std::path::{Path, PathBuf};

use ndarray::s;

use crate::imaging::domain::image_reader::ImageReader;
use crate::shared::error::{FaceBlurError, Result};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Holds the one image being edited.
///
/// Edits are destructive and cumulative; there is no history. A failed
/// load leaves the previous image in place.
#[derive(Debug, Default)]
pub struct ImageStore {
    frame: Option<Frame>,
    source_path: Option<PathBuf>,
    revision: u64,
    saved_revision: u64,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `path` and replaces the current image only if decoding succeeds.
    pub fn load(&mut self, path: &Path, reader: &dyn ImageReader) -> Result<&Frame> {
        let frame = reader.read(path)?;
        log::info!(
            "Loaded {} ({}x{}, {} channels)",
            path.display(),
            frame.width(),
            frame.height(),
            frame.channels()
        );
        Ok(self.install(frame, Some(path.to_path_buf())))
    }

    /// Replaces the current image with an already decoded frame.
    pub fn install(&mut self, frame: Frame, source_path: Option<PathBuf>) -> &Frame {
        self.source_path = source_path;
        self.revision += 1;
        self.saved_revision = self.revision;
        self.frame.insert(frame)
    }

    pub fn current(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Counter bumped by every install and pixel edit.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True when pixels changed since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Records that the pixels as of `revision` are on disk.
    ///
    /// Edits made after `revision` was read keep the image dirty, and a
    /// stale revision never moves the saved mark backwards.
    pub fn mark_saved(&mut self, revision: u64) {
        self.saved_revision = self.saved_revision.max(revision.min(self.revision));
    }

    /// Copies the pixels inside `rect` into a new frame.
    pub fn extract_region(&self, rect: &Region) -> Result<Frame> {
        let frame = self.frame.as_ref().ok_or(FaceBlurError::NoImage)?;
        check_bounds(frame, rect)?;
        let view = frame.as_ndarray();
        let sub = view.slice(s![
            rect.y1() as usize..rect.y2() as usize,
            rect.x1() as usize..rect.x2() as usize,
            ..
        ]);
        Ok(Frame::with_order(
            sub.iter().copied().collect(),
            rect.width(),
            rect.height(),
            frame.channels(),
            frame.channel_order(),
        ))
    }

    /// Overwrites the pixels inside `rect` with `patch`.
    ///
    /// The patch must have exactly the rect's size and the image's channel count.
    pub fn replace_region(&mut self, rect: &Region, patch: &Frame) -> Result<()> {
        let frame = self.frame.as_mut().ok_or(FaceBlurError::NoImage)?;
        check_bounds(frame, rect)?;

        let expected = (rect.width(), rect.height(), frame.channels());
        let actual = (patch.width(), patch.height(), patch.channels());
        if expected != actual {
            return Err(FaceBlurError::DimensionMismatch { expected, actual });
        }

        frame
            .as_ndarray_mut()
            .slice_mut(s![
                rect.y1() as usize..rect.y2() as usize,
                rect.x1() as usize..rect.x2() as usize,
                ..
            ])
            .assign(&patch.as_ndarray());
        self.revision += 1;
        Ok(())
    }
}

fn check_bounds(frame: &Frame, rect: &Region) -> Result<()> {
    if rect.fits_within(frame.width(), frame.height()) {
        Ok(())
    } else {
        Err(FaceBlurError::RegionOutOfBounds {
            x1: rect.x1(),
            y1: rect.y1(),
            x2: rect.x2(),
            y2: rect.y2(),
            width: frame.width(),
            height: frame.height(),
        })
    }
}
