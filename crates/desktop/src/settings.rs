use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use faceblur_core::blurring::domain::blur_settings::{BlurProfile, BlurSettings};
use faceblur_core::selection::domain::selection_session::EmptyRegionPolicy;
use faceblur_core::shared::constants::{DEFAULT_SIGMA, STRONG_KERNEL_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurStrength {
    #[default]
    Strong,
    Soft,
    Custom,
}

impl BlurStrength {
    pub const ALL: &[BlurStrength] = &[BlurStrength::Strong, BlurStrength::Soft, BlurStrength::Custom];
}

impl std::fmt::Display for BlurStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlurStrength::Strong => write!(f, "Strong (99px)"),
            BlurStrength::Soft => write!(f, "Soft (23px)"),
            BlurStrength::Custom => write!(f, "Custom"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    #[default]
    System,
    Dark,
    Light,
}

impl Appearance {
    pub const ALL: &[Appearance] = &[Appearance::System, Appearance::Dark, Appearance::Light];
}

impl std::fmt::Display for Appearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Appearance::System => write!(f, "System"),
            Appearance::Dark => write!(f, "Dark"),
            Appearance::Light => write!(f, "Light"),
        }
    }
}

/// Startup configuration, read once from the user's config directory.
///
/// Changes made in the Settings tab last for the session only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub blur_strength: BlurStrength,
    /// Used when `blur_strength` is `custom`.
    pub kernel_size: usize,
    pub sigma: f64,
    pub keep_empty_regions: bool,
    pub max_canvas_width: f32,
    pub max_canvas_height: f32,
    pub appearance: Appearance,
    pub high_contrast: bool,
    pub font_scale: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blur_strength: BlurStrength::Strong,
            kernel_size: STRONG_KERNEL_SIZE,
            sigma: DEFAULT_SIGMA,
            keep_empty_regions: false,
            max_canvas_width: 1100.0,
            max_canvas_height: 680.0,
            appearance: Appearance::System,
            high_contrast: false,
            font_scale: 1.0,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FaceBlur").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .map(|json| Self::from_json(&json))
            .unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable settings file: {e}");
            Self::default()
        })
    }

    pub fn blur_settings(&self) -> BlurSettings {
        match self.blur_strength {
            BlurStrength::Strong => BlurProfile::Strong.settings(),
            BlurStrength::Soft => BlurProfile::Soft.settings(),
            BlurStrength::Custom => BlurSettings {
                kernel_size: self.kernel_size,
                sigma: self.sigma,
            },
        }
    }

    pub fn empty_region_policy(&self) -> EmptyRegionPolicy {
        if self.keep_empty_regions {
            EmptyRegionPolicy::Keep
        } else {
            EmptyRegionPolicy::Discard
        }
    }
}
