pub mod blur_settings;
pub mod frame_blurrer;
