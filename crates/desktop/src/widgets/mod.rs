pub mod primary_button;
pub mod selection_overlay;
