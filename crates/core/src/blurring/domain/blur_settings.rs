use crate::shared::constants::{
    DEFAULT_SIGMA, MAX_KERNEL_SIZE, SOFT_KERNEL_SIZE, STRONG_KERNEL_SIZE,
};
use crate::shared::error::{FaceBlurError, Result};

/// Named blur strength presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlurProfile {
    /// 99x99 kernel, sigma 30.
    #[default]
    Strong,
    /// 23x23 kernel, sigma 30.
    Soft,
}

impl BlurProfile {
    pub fn settings(self) -> BlurSettings {
        match self {
            BlurProfile::Strong => BlurSettings {
                kernel_size: STRONG_KERNEL_SIZE,
                sigma: DEFAULT_SIGMA,
            },
            BlurProfile::Soft => BlurSettings {
                kernel_size: SOFT_KERNEL_SIZE,
                sigma: DEFAULT_SIGMA,
            },
        }
    }
}

impl std::fmt::Display for BlurProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlurProfile::Strong => write!(f, "Strong"),
            BlurProfile::Soft => write!(f, "Soft"),
        }
    }
}

impl std::str::FromStr for BlurProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strong" => Ok(BlurProfile::Strong),
            "soft" => Ok(BlurProfile::Soft),
            other => Err(format!("unknown blur profile '{other}' (expected strong or soft)")),
        }
    }
}

/// Fixed Gaussian kernel configuration.
///
/// A non-positive sigma is derived from the kernel size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurSettings {
    pub kernel_size: usize,
    pub sigma: f64,
}

impl Default for BlurSettings {
    fn default() -> Self {
        BlurProfile::default().settings()
    }
}

impl BlurSettings {
    pub fn new(kernel_size: usize, sigma: f64) -> Result<Self> {
        let settings = Self { kernel_size, sigma };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
            return Err(FaceBlurError::InvalidBlurSettings(format!(
                "kernel size must be a positive odd integer, got {}",
                self.kernel_size
            )));
        }
        if self.kernel_size > MAX_KERNEL_SIZE {
            return Err(FaceBlurError::InvalidBlurSettings(format!(
                "kernel size must be at most {MAX_KERNEL_SIZE}, got {}",
                self.kernel_size
            )));
        }
        if !self.sigma.is_finite() {
            return Err(FaceBlurError::InvalidBlurSettings(format!(
                "sigma must be finite, got {}",
                self.sigma
            )));
        }
        Ok(())
    }

    pub fn effective_sigma(&self) -> f64 {
        if self.sigma > 0.0 {
            self.sigma
        } else {
            0.3 * ((self.kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8
        }
    }

    /// True when the kernel is shorter than ~6 sigma and cuts off the Gaussian tails.
    pub fn truncates(&self) -> bool {
        (self.kernel_size as f64) < 6.0 * self.effective_sigma()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_profiles_match_presets() {
        assert_eq!(BlurProfile::Strong.settings().kernel_size, 99);
        assert_eq!(BlurProfile::Soft.settings().kernel_size, 23);
        assert_relative_eq!(BlurProfile::Strong.settings().sigma, 30.0);
        assert_relative_eq!(BlurProfile::Soft.settings().sigma, 30.0);
    }

    #[test]
    fn test_default_is_strong() {
        assert_eq!(BlurSettings::default(), BlurProfile::Strong.settings());
    }

    #[rstest]
    #[case::zero(0)]
    #[case::even(24)]
    #[case::above_max(MAX_KERNEL_SIZE + 2)]
    #[case::huge(100_001)]
    #[case::usize_max(usize::MAX)]
    fn test_rejects_bad_kernel_size(#[case] kernel_size: usize) {
        assert!(matches!(
            BlurSettings::new(kernel_size, 30.0),
            Err(FaceBlurError::InvalidBlurSettings(_))
        ));
    }

    #[test]
    fn test_accepts_max_kernel_size() {
        assert!(BlurSettings::new(MAX_KERNEL_SIZE, 0.0).is_ok());
    }

    #[test]
    fn test_rejects_nan_sigma() {
        assert!(BlurSettings::new(5, f64::NAN).is_err());
    }

    #[test]
    fn test_non_positive_sigma_is_derived_from_kernel() {
        let s = BlurSettings::new(7, 0.0).unwrap();
        assert_relative_eq!(s.effective_sigma(), 0.3 * (3.0 - 1.0) + 0.8);
    }

    #[test]
    fn test_both_presets_truncate() {
        assert!(BlurProfile::Strong.settings().truncates());
        assert!(BlurProfile::Soft.settings().truncates());
        assert!(!BlurSettings::new(61, 10.0).unwrap().truncates());
    }

    #[test]
    fn test_profile_parse_is_case_insensitive() {
        assert_eq!("SOFT".parse::<BlurProfile>(), Ok(BlurProfile::Soft));
        assert!("medium".parse::<BlurProfile>().is_err());
    }
}
