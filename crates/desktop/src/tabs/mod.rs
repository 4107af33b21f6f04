pub mod about_tab;
pub mod editor_tab;
pub mod settings_tab;
