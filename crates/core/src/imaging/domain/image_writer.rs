use std::path::{Path, PathBuf};

use crate::shared::constants::{DEFAULT_SAVE_EXTENSION, OUTPUT_SUFFIX};
use crate::shared::error::Result;
use crate::shared::frame::Frame;

/// Writes a single frame to an image file.
pub trait ImageWriter: Send {
    /// Encodes the frame in the format implied by the path's extension.
    ///
    /// On failure the destination is left as it was.
    fn write(&self, path: &Path, frame: &Frame) -> Result<()>;
}

/// `{stem}_blurred.png` next to the input file.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}.{DEFAULT_SAVE_EXTENSION}"))
}
