use std::path::{Path, PathBuf};

use crate::blurring::domain::frame_blurrer::FrameBlurrer;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_store::ImageStore;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::selection::domain::selection_session::{EmptyRegionPolicy, SelectionSession};
use crate::selection::domain::view_transform::ViewTransform;
use crate::shared::error::{FaceBlurError, Result};
use crate::shared::frame::Frame;
use crate::shared::region::{PixelPoint, Region};

/// Interactive editing pipeline: open → select → confirm → blur → save.
///
/// Owns the image store and the selection for the current image. Pointer
/// events arrive in canvas space and go through the view transform before
/// they reach the selection.
pub struct EditorSession {
    store: ImageStore,
    selection: Option<SelectionSession>,
    blurrer: Box<dyn FrameBlurrer>,
    policy: EmptyRegionPolicy,
    view: ViewTransform,
}

impl EditorSession {
    pub fn new(blurrer: Box<dyn FrameBlurrer>, policy: EmptyRegionPolicy) -> Self {
        Self {
            store: ImageStore::new(),
            selection: None,
            blurrer,
            policy,
            view: ViewTransform::identity(),
        }
    }

    /// Loads an image. On failure the current image and selection are kept.
    pub fn open(&mut self, path: &Path, reader: &dyn ImageReader) -> Result<()> {
        let frame = self.store.load(path, reader)?;
        self.selection = Some(SelectionSession::with_policy(
            frame.width(),
            frame.height(),
            self.policy,
        ));
        Ok(())
    }

    /// Installs an image decoded elsewhere and starts a fresh selection.
    pub fn install(&mut self, frame: Frame, source_path: Option<PathBuf>) {
        let frame = self.store.install(frame, source_path);
        log::info!("Editing {}x{} image", frame.width(), frame.height());
        self.selection = Some(SelectionSession::with_policy(
            frame.width(),
            frame.height(),
            self.policy,
        ));
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.store.current()
    }

    pub fn selection(&self) -> Option<&SelectionSession> {
        self.selection.as_ref()
    }

    pub fn view(&self) -> ViewTransform {
        self.view
    }

    pub fn set_view(&mut self, view: ViewTransform) {
        self.view = view;
    }

    pub fn set_blurrer(&mut self, blurrer: Box<dyn FrameBlurrer>) {
        self.blurrer = blurrer;
    }

    pub fn set_policy(&mut self, policy: EmptyRegionPolicy) {
        self.policy = policy;
        if let Some(selection) = self.selection.as_mut() {
            selection.set_policy(policy);
        }
    }

    fn canvas_to_image(&self, x: f32, y: f32) -> Option<PixelPoint> {
        let selection = self.selection.as_ref()?;
        let (width, height) = selection.bounds();
        Some(self.view.to_image_snapped(x, y, width, height))
    }

    pub fn pointer_pressed(&mut self, x: f32, y: f32) {
        if let Some(point) = self.canvas_to_image(x, y) {
            if let Some(selection) = self.selection.as_mut() {
                selection.press(point);
            }
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if let Some(point) = self.canvas_to_image(x, y) {
            if let Some(selection) = self.selection.as_mut() {
                selection.drag(point);
            }
        }
    }

    pub fn pointer_released(&mut self, x: f32, y: f32) -> Option<Region> {
        let point = self.canvas_to_image(x, y)?;
        self.selection.as_mut()?.release(point)
    }

    /// Adds a rectangle given in image coordinates as one complete gesture.
    pub fn select_region(&mut self, region: &Region) -> Option<Region> {
        let selection = self.selection.as_mut()?;
        selection.press(PixelPoint::new(region.x1(), region.y1()));
        selection.release(PixelPoint::new(region.x2(), region.y2()))
    }

    /// Moves pending rectangles to the confirmed list. Returns how many moved.
    pub fn confirm_selection(&mut self) -> usize {
        self.selection.as_mut().map_or(0, SelectionSession::confirm)
    }

    /// Drops every pending and confirmed rectangle and any live gesture.
    pub fn clear_selection(&mut self) {
        if let Some(selection) = self.selection.as_mut() {
            selection.clear();
        }
    }

    pub fn can_blur(&self) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| !s.confirmed().is_empty())
    }

    /// Blurs every confirmed rectangle and re-arms the selection.
    ///
    /// Each rectangle is clamped, copied out of the store, blurred as an
    /// isolated patch and written back, in order, so overlapping rectangles
    /// are blurred twice. If the blur fails, patches already written are
    /// restored and the confirmed rectangles stay queued.
    pub fn apply_blur(&mut self) -> Result<usize> {
        let selection = self.selection.as_mut().ok_or(FaceBlurError::NoImage)?;
        let (width, height) = match self.store.current() {
            Some(frame) => (frame.width(), frame.height()),
            None => return Err(FaceBlurError::NoImage),
        };

        let regions: Vec<Region> = selection
            .confirmed()
            .iter()
            .map(|r| r.clamp_to(width, height))
            .filter(|r| !r.is_empty())
            .collect();

        let mut originals: Vec<(Region, Frame)> = Vec::with_capacity(regions.len());
        for region in &regions {
            let original = self.store.extract_region(region)?;
            let mut patch = original.clone();
            let whole = Region::from_xywh(0, 0, patch.width() as i32, patch.height() as i32);
            if let Err(e) = self.blurrer.blur(&mut patch, &[whole]) {
                for (done, pixels) in originals.iter().rev() {
                    self.store.replace_region(done, pixels)?;
                }
                return Err(FaceBlurError::Blur(e.to_string()));
            }
            self.store.replace_region(region, &patch)?;
            originals.push((*region, original));
        }
        selection.take_confirmed();

        log::info!("Blurred {} region(s)", regions.len());
        Ok(regions.len())
    }

    /// Writes the current image. The store is left untouched on failure.
    pub fn save(&mut self, path: &Path, writer: &dyn ImageWriter) -> Result<()> {
        let frame = self.store.current().ok_or(FaceBlurError::NoImage)?;
        writer.write(path, frame)?;
        self.store.mark_saved(self.store.revision());
        Ok(())
    }

    /// Pixel revision of the current image; pass it back to
    /// [`mark_saved`](Self::mark_saved) once a copy taken now is on disk.
    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    /// Records a save performed outside the session, e.g. on a background
    /// task holding a copy of the frame taken at `revision`.
    pub fn mark_saved(&mut self, revision: u64) {
        self.store.mark_saved(revision);
    }
}
