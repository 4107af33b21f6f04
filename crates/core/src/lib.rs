pub mod blurring;
pub mod imaging;
pub mod pipeline;
pub mod selection;
pub mod shared;
