use std::path::Path;

use crate::blurring::domain::frame_blurrer::FrameBlurrer;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::pipeline::editor_session::EditorSession;
use crate::selection::domain::selection_session::EmptyRegionPolicy;
use crate::shared::error::Result;
use crate::shared::region::Region;

/// Single-image, non-interactive pipeline: read → select → blur → write.
///
/// Rectangles are replayed as press/release gestures so they are clamped
/// and filtered exactly like interactive selections.
pub struct BlurImageUseCase {
    reader: Box<dyn ImageReader>,
    image_writer: Box<dyn ImageWriter>,
    session: EditorSession,
}

impl BlurImageUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        image_writer: Box<dyn ImageWriter>,
        blurrer: Box<dyn FrameBlurrer>,
        policy: EmptyRegionPolicy,
    ) -> Self {
        Self {
            reader,
            image_writer,
            session: EditorSession::new(blurrer, policy),
        }
    }

    /// Returns the number of rectangles that were blurred.
    pub fn execute(
        &mut self,
        input_path: &Path,
        output_path: &Path,
        regions: &[Region],
    ) -> Result<usize> {
        self.session.open(input_path, self.reader.as_ref())?;

        for r in regions {
            if self.session.select_region(r).is_none() {
                log::warn!("Skipping empty region {r}");
            }
        }
        self.session.confirm_selection();

        let blurred = self.session.apply_blur()?;
        self.session.save(output_path, self.image_writer.as_ref())?;
        Ok(blurred)
    }
}
