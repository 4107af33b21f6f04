pub mod blur_image_use_case;
pub mod editor_session;
