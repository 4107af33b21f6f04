use std::path::Path;

use crate::imaging::domain::image_reader::ImageReader;
use crate::shared::error::{FaceBlurError, Result};
use crate::shared::frame::{ChannelOrder, Frame};

/// Decodes image files with the `image` crate into 3-channel frames.
///
/// Alpha is dropped. The channel order of the produced frame is chosen at
/// construction; RGB unless built with [`ImageFileReader::with_order`].
pub struct ImageFileReader {
    order: ChannelOrder,
}

impl ImageFileReader {
    pub fn new() -> Self {
        Self::with_order(ChannelOrder::Rgb)
    }

    pub fn with_order(order: ChannelOrder) -> Self {
        Self { order }
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<Frame> {
        if !path.is_file() {
            return Err(FaceBlurError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let rgb = image::open(path)
            .map_err(|source| FaceBlurError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .into_rgb8();
        let (width, height) = rgb.dimensions();
        let mut data = rgb.into_raw();

        if self.order == ChannelOrder::Bgr {
            for px in data.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
        }

        Ok(Frame::with_order(data, width, height, 3, self.order))
    }
}
