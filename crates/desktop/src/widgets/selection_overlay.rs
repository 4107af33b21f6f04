use iced::mouse;
use iced::widget::canvas::{self, Frame, Path, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use faceblur_core::selection::domain::selection_session::{OverlayRect, OverlayStyle};
use faceblur_core::selection::domain::view_transform::ViewTransform;

use crate::theme::{confirmed_color, selection_color};

const STROKE_WIDTH: f32 = 2.0;
const CONFIRMED_FILL_ALPHA: f32 = 0.15;

/// Pointer events in canvas coordinates, relative to the image's top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed(Point),
    Moved(Point),
    Released(Point),
}

/// Canvas program drawn on top of the image: outlines every rectangle of
/// the selection and turns left-button gestures into [`PointerEvent`]s.
pub struct SelectionOverlay<Message> {
    rects: Vec<OverlayRect>,
    view: ViewTransform,
    armed: bool,
    dragging: bool,
    on_pointer: fn(PointerEvent) -> Message,
}

impl<Message> SelectionOverlay<Message> {
    pub fn new(
        rects: Vec<OverlayRect>,
        view: ViewTransform,
        armed: bool,
        dragging: bool,
        on_pointer: fn(PointerEvent) -> Message,
    ) -> Self {
        Self {
            rects,
            view,
            armed,
            dragging,
            on_pointer,
        }
    }
}

impl<Message> canvas::Program<Message> for SelectionOverlay<Message> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        if !self.armed {
            return None;
        }

        // Drags may leave the canvas; the selection clamps the result.
        let relative = cursor.position_from(bounds.position());
        let pointer = match event {
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                PointerEvent::Pressed(cursor.position_in(bounds)?)
            }
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) if self.dragging => {
                PointerEvent::Moved(relative?)
            }
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left))
                if self.dragging =>
            {
                PointerEvent::Released(relative?)
            }
            _ => return None,
        };

        Some(canvas::Action::publish((self.on_pointer)(pointer)).and_capture())
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());

        for rect in &self.rects {
            let (x, y, w, h) = self.view.to_canvas(&rect.region);
            let path = Path::rectangle(Point::new(x, y), Size::new(w, h));
            let color = match rect.style {
                OverlayStyle::InProgress | OverlayStyle::Pending => selection_color(),
                OverlayStyle::Confirmed => {
                    frame.fill(
                        &path,
                        Color {
                            a: CONFIRMED_FILL_ALPHA,
                            ..confirmed_color()
                        },
                    );
                    confirmed_color()
                }
            };
            frame.stroke(
                &path,
                Stroke::default().with_color(color).with_width(STROKE_WIDTH),
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if self.armed && (self.dragging || cursor.is_over(bounds)) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}
