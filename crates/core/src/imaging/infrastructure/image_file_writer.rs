use std::io::{BufWriter, Write};
use std::path::Path;

use image::{DynamicImage, ImageFormat};

use crate::imaging::domain::image_writer::ImageWriter;
use crate::shared::constants::IMAGE_EXTENSIONS;
use crate::shared::error::{FaceBlurError, Result};
use crate::shared::frame::Frame;

/// Writes a single frame to an image file using the `image` crate.
///
/// The frame is converted to RGB according to its declared channel order,
/// encoded into a temporary file beside the destination and then renamed
/// over it, so a failed save never leaves a partial file behind.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn output_format(path: &Path) -> Result<ImageFormat> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| FaceBlurError::UnsupportedFormat(path.to_path_buf()))?;
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(FaceBlurError::UnsupportedFormat(path.to_path_buf()));
    }
    ImageFormat::from_extension(&ext).ok_or_else(|| FaceBlurError::UnsupportedFormat(path.to_path_buf()))
}

fn to_dynamic_image(frame: &Frame, format: ImageFormat) -> Option<DynamicImage> {
    let (w, h) = (frame.width(), frame.height());
    let data = frame.rgb_data().into_owned();
    let img = match frame.channels() {
        1 => DynamicImage::ImageLuma8(image::GrayImage::from_raw(w, h, data)?),
        3 => DynamicImage::ImageRgb8(image::RgbImage::from_raw(w, h, data)?),
        4 => DynamicImage::ImageRgba8(image::RgbaImage::from_raw(w, h, data)?),
        _ => return None,
    };
    // JPEG has no alpha channel.
    if format == ImageFormat::Jpeg && img.color().has_alpha() {
        return Some(DynamicImage::ImageRgb8(img.to_rgb8()));
    }
    Some(img)
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<()> {
        let format = output_format(path)?;
        let write_err = |source: Box<dyn std::error::Error + Send + Sync>| FaceBlurError::Write {
            path: path.to_path_buf(),
            source,
        };

        let img = to_dynamic_image(frame, format)
            .ok_or_else(|| write_err("frame data does not match its dimensions".into()))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut builder = tempfile::Builder::new();
        builder.prefix(".faceblur-");
        // Same mode as a plain `File::create`: 0o666 less the umask.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder.tempfile_in(dir).map_err(|e| write_err(e.into()))?;

        {
            let mut out = BufWriter::new(tmp.as_file_mut());
            img.write_to(&mut out, format)
                .map_err(|e| write_err(e.into()))?;
            out.flush().map_err(|e| write_err(e.into()))?;
        }

        // An overwritten file keeps its mode.
        if let Ok(existing) = std::fs::metadata(path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(|e| write_err(e.into()))?;
        }

        tmp.persist(path).map_err(|e| write_err(e.error.into()))?;
        log::info!(
            "Wrote {} ({}x{}, {:?})",
            path.display(),
            frame.width(),
            frame.height(),
            format
        );
        Ok(())
    }
}
