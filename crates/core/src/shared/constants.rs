/// Extensions offered by the open dialog.
pub const OPEN_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Extensions the writer knows how to encode.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff", "tif", "webp"];

pub const DEFAULT_SAVE_EXTENSION: &str = "png";

/// Suffix appended to the input stem when no output path is given.
pub const OUTPUT_SUFFIX: &str = "_blurred";

pub const STRONG_KERNEL_SIZE: usize = 99;
pub const SOFT_KERNEL_SIZE: usize = 23;
/// Largest accepted kernel; the tap tables grow linearly with it.
pub const MAX_KERNEL_SIZE: usize = 1001;
pub const DEFAULT_SIGMA: f64 = 30.0;
