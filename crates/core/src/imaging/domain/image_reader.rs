use std::path::Path;

use crate::shared::error::Result;
use crate::shared::frame::Frame;

/// Decodes a raster image file into a [`Frame`].
///
/// Implementations report a missing path as `FileNotFound` and anything
/// that is not a decodable raster as `Decode`.
pub trait ImageReader: Send {
    fn read(&self, path: &Path) -> Result<Frame>;
}
