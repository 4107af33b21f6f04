use iced::widget::{column, text, Space};
use iced::Element;

use crate::app::{scaled, Message};

pub fn view(fs: f32) -> Element<'static, Message> {
    let version = env!("CARGO_PKG_VERSION");

    column![
        text("FaceBlur").size(scaled(22.0, fs)),
        Space::new().height(4),
        text(format!("Version {version}")).size(scaled(13.0, fs)),
        Space::new().height(12),
        text(
            "Draw rectangles over faces or other details, confirm them, and \
             apply a Gaussian blur. Everything happens on this computer."
        )
        .size(scaled(13.0, fs)),
        Space::new().height(20),
        text("Blurring is permanent").size(scaled(16.0, fs)),
        Space::new().height(8),
        text(
            "Blurred pixels are overwritten in the saved file and cannot be \
             recovered. Keep a copy of the original if you might need it."
        )
        .size(scaled(13.0, fs)),
    ]
    .spacing(0)
    .into()
}
