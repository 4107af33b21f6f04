pub mod selection_session;
pub mod view_transform;
