use iced::widget::{button, checkbox, column, pick_list, row, text, Space};
use iced::{Alignment, Element};

use crate::app::{scaled, Message};
use crate::settings::{Appearance, BlurStrength, Settings};

pub fn view<'a>(settings: &Settings) -> Element<'a, Message> {
    let fs = settings.font_scale;
    let blur = settings.blur_settings();

    column![
        text("Blur").size(scaled(16.0, fs)),
        Space::new().height(8),
        row![
            text("Strength").size(scaled(13.0, fs)),
            pick_list(BlurStrength::ALL, Some(settings.blur_strength), |s| {
                Message::BlurStrengthChanged(s)
            })
            .text_size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        text(format!(
            "Kernel {0}\u{00d7}{0}, sigma {1}",
            blur.kernel_size, blur.sigma
        ))
        .size(scaled(12.0, fs)),
        Space::new().height(12),
        checkbox(settings.keep_empty_regions)
            .label("Keep zero-area rectangles")
            .on_toggle(Message::KeepEmptyRegionsChanged)
            .text_size(scaled(13.0, fs)),
        Space::new().height(20),
        text("Theme").size(scaled(16.0, fs)),
        Space::new().height(8),
        row![
            text("Mode").size(scaled(13.0, fs)),
            pick_list(Appearance::ALL, Some(settings.appearance), |a| {
                Message::AppearanceChanged(a)
            })
            .text_size(scaled(13.0, fs)),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        Space::new().height(12),
        checkbox(settings.high_contrast)
            .label("High contrast")
            .on_toggle(Message::HighContrastChanged)
            .text_size(scaled(13.0, fs)),
        Space::new().height(20),
        text("Changes here last until the app closes. Defaults are read from settings.json.")
            .size(scaled(12.0, fs)),
        Space::new().height(8),
        button(text("Open settings folder").size(scaled(13.0, fs)))
            .on_press(Message::OpenSettingsFolder)
            .padding([8, 16]),
    ]
    .spacing(0)
    .into()
}
