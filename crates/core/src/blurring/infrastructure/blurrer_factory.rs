use crate::blurring::domain::blur_settings::BlurSettings;
use crate::blurring::domain::frame_blurrer::FrameBlurrer;
use crate::shared::error::Result;

use super::cpu_rectangular_blurrer::CpuRectangularBlurrer;

/// Validates the settings and builds the rectangular blurrer.
///
/// Logs the chosen kernel and warns when it is too short for its sigma,
/// which leaves visible truncation in the result.
pub fn create_blurrer(settings: BlurSettings) -> Result<Box<dyn FrameBlurrer>> {
    settings.validate()?;
    log::info!(
        "Using CPU rectangular blur (kernel_size={}, sigma={:.1})",
        settings.kernel_size,
        settings.effective_sigma()
    );
    if settings.truncates() {
        log::warn!(
            "Kernel size {} is below 6*sigma ({:.0}); the blur will be truncated",
            settings.kernel_size,
            6.0 * settings.effective_sigma()
        );
    }
    Ok(Box::new(CpuRectangularBlurrer::new(settings)))
}
