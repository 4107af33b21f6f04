use iced::widget::{button, canvas, column, container, image, row, stack, text, Space};
use iced::{Alignment, ContentFit, Element, Length};

use faceblur_core::pipeline::editor_session::EditorSession;

use crate::app::{scaled, Message};
use crate::widgets::primary_button::primary_button;
use crate::widgets::selection_overlay::SelectionOverlay;

pub struct EditorTab<'a> {
    pub font_scale: f32,
    pub editor: &'a EditorSession,
    pub preview: Option<&'a image::Handle>,
    pub selecting: bool,
    pub blur_hovered: bool,
    pub busy: bool,
}

pub fn view(tab: EditorTab<'_>) -> Element<'_, Message> {
    let fs = tab.font_scale;
    let loaded = tab.editor.frame().is_some();
    let selection = tab.editor.selection();
    let has_pending = selection.is_some_and(|s| !s.pending().is_empty());
    let has_any = selection.is_some_and(|s| !s.overlay().is_empty());

    let toolbar = row![
        button(text("Open").size(scaled(13.0, fs)))
            .on_press_maybe((!tab.busy).then_some(Message::OpenImage))
            .padding([8, 16]),
        button(text("Select").size(scaled(13.0, fs)))
            .on_press_maybe((loaded && !tab.selecting).then_some(Message::StartSelecting))
            .padding([8, 16]),
        button(text("Confirm").size(scaled(13.0, fs)))
            .on_press_maybe(has_pending.then_some(Message::ConfirmSelection))
            .padding([8, 16]),
        button(text("Clear").size(scaled(13.0, fs)))
            .on_press_maybe(has_any.then_some(Message::ClearSelection))
            .padding([8, 16]),
        primary_button(
            "Blur",
            scaled(13.0, fs),
            (tab.editor.can_blur() && !tab.busy).then_some(Message::ApplyBlur),
            tab.blur_hovered,
            Message::BlurHovered,
        ),
        button(text("Save").size(scaled(13.0, fs)))
            .on_press_maybe((loaded && !tab.busy).then_some(Message::SaveImage))
            .padding([8, 16]),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let surface: Element<'_, Message> = match (tab.editor.frame(), tab.preview, selection) {
        (Some(frame), Some(handle), Some(selection)) => {
            let view = tab.editor.view();
            let (w, h) = view.canvas_size(frame.width(), frame.height());
            let overlay = SelectionOverlay::new(
                selection.overlay(),
                view,
                tab.selecting,
                selection.is_dragging(),
                Message::Pointer,
            );
            stack![
                image(handle.clone())
                    .width(w)
                    .height(h)
                    .content_fit(ContentFit::Fill),
                canvas(overlay).width(w).height(h),
            ]
            .into()
        }
        _ => text("Open an image, press Select, then drag rectangles over the areas to hide.")
            .size(scaled(13.0, fs))
            .into(),
    };

    column![
        toolbar,
        Space::new().height(12),
        container(surface)
            .center_x(Length::Fill)
            .height(Length::Fill),
        text("Blue: not yet confirmed \u{00b7} Green: will be blurred").size(scaled(11.0, fs)),
    ]
    .spacing(4)
    .into()
}
