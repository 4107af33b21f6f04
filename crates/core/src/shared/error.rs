use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaceBlurError {
    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("patch is {actual:?} but region is {expected:?} (width, height, channels)")]
    DimensionMismatch {
        expected: (u32, u32, u8),
        actual: (u32, u32, u8),
    },
    #[error("region ({x1},{y1})-({x2},{y2}) exceeds image bounds {width}x{height}")]
    RegionOutOfBounds {
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        width: u32,
        height: u32,
    },
    #[error("no image loaded")]
    NoImage,
    #[error("invalid blur settings: {0}")]
    InvalidBlurSettings(String),
    #[error("blur failed: {0}")]
    Blur(String),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("unsupported output format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

pub type Result<T> = std::result::Result<T, FaceBlurError>;
