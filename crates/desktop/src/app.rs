use std::path::PathBuf;
use std::time::Duration;

use iced::widget::{button, column, container, image, row, scrollable, text};
use iced::{Element, Length, Subscription, Task, Theme};

use faceblur_core::blurring::domain::blur_settings::BlurSettings;
use faceblur_core::blurring::domain::frame_blurrer::FrameBlurrer;
use faceblur_core::blurring::infrastructure::blurrer_factory::create_blurrer;
use faceblur_core::blurring::infrastructure::cpu_rectangular_blurrer::CpuRectangularBlurrer;
use faceblur_core::imaging::domain::image_reader::ImageReader;
use faceblur_core::imaging::domain::image_writer::{default_output_path, ImageWriter};
use faceblur_core::imaging::infrastructure::image_file_reader::ImageFileReader;
use faceblur_core::imaging::infrastructure::image_file_writer::ImageFileWriter;
use faceblur_core::pipeline::editor_session::EditorSession;
use faceblur_core::selection::domain::view_transform::ViewTransform;
use faceblur_core::shared::constants::{DEFAULT_SAVE_EXTENSION, OPEN_EXTENSIONS};
use faceblur_core::shared::frame::Frame;

use crate::settings::{Appearance, BlurStrength, Settings};
use crate::tabs;
use crate::tabs::editor_tab::EditorTab;
use crate::theme;
use crate::widgets::selection_overlay::PointerEvent;

// ---------------------------------------------------------------------------
// Tab enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Editor,
    Settings,
    About,
}

impl Tab {
    const ALL: &[Tab] = &[Tab::Editor, Tab::Settings, Tab::About];

    fn label(self) -> &'static str {
        match self {
            Tab::Editor => "Editor",
            Tab::Settings => "Settings",
            Tab::About => "About",
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub frame: Frame,
}

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    OpenImage,
    /// `Ok(None)` when the dialog was cancelled.
    ImageLoaded(Result<Option<LoadedImage>, String>),
    StartSelecting,
    Pointer(PointerEvent),
    ConfirmSelection,
    ClearSelection,
    ApplyBlur,
    BlurHovered(bool),
    SaveImage,
    /// Carries the pixel revision the saved copy was taken at.
    Saved(u64, Result<Option<PathBuf>, String>),
    BlurStrengthChanged(BlurStrength),
    KeepEmptyRegionsChanged(bool),
    AppearanceChanged(Appearance),
    HighContrastChanged(bool),
    OpenSettingsFolder,
    PollSystemTheme,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    active_tab: Tab,
    settings: Settings,
    editor: EditorSession,
    preview: Option<image::Handle>,
    selecting: bool,
    blur_hovered: bool,
    busy: bool,
    status: String,
}

impl App {
    pub fn new(initial_path: Option<PathBuf>) -> (Self, Task<Message>) {
        Self::with_settings(Settings::load(), initial_path)
    }

    fn with_settings(settings: Settings, initial_path: Option<PathBuf>) -> (Self, Task<Message>) {
        let (blurrer, warning) = build_blurrer(settings.blur_settings());
        let editor = EditorSession::new(blurrer, settings.empty_region_policy());

        let mut app = Self {
            active_tab: Tab::Editor,
            settings,
            editor,
            preview: None,
            selecting: false,
            blur_hovered: false,
            busy: false,
            status: warning.unwrap_or_else(|| "Open an image to begin.".into()),
        };

        let task = match initial_path {
            Some(path) => {
                app.busy = true;
                app.status = format!("Opening {}\u{2026}", path.display());
                Task::perform(async move { decode(path) }, Message::ImageLoaded)
            }
            None => Task::none(),
        };
        (app, task)
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
            }
            Message::OpenImage => {
                self.busy = true;
                return Task::perform(pick_and_decode(), Message::ImageLoaded);
            }
            Message::ImageLoaded(result) => {
                self.busy = false;
                match result {
                    Ok(Some(loaded)) => self.install(loaded),
                    Ok(None) => {}
                    Err(e) => {
                        log::error!("Load failed: {e}");
                        self.status = format!("Could not open image: {e}");
                    }
                }
            }
            Message::StartSelecting => {
                self.selecting = true;
                self.status = "Drag over the image to mark rectangles, then press Confirm.".into();
            }
            Message::Pointer(event) => self.handle_pointer(event),
            Message::ConfirmSelection => {
                let moved = self.editor.confirm_selection();
                let total = self.editor.selection().map_or(0, |s| s.confirmed().len());
                self.status =
                    format!("Confirmed {moved} rectangle(s), {total} ready. Press Blur to apply.");
            }
            Message::ClearSelection => {
                self.editor.clear_selection();
                self.status = "Cleared all rectangles.".into();
            }
            Message::ApplyBlur if self.busy => {
                self.status = "Wait for the current save to finish before blurring.".into();
            }
            Message::ApplyBlur => match self.editor.apply_blur() {
                Ok(count) => {
                    self.refresh_preview();
                    self.status = format!("Blurred {count} region(s).");
                }
                Err(e) => {
                    log::error!("Blur failed: {e}");
                    self.status = format!("Blur failed: {e}");
                }
            },
            Message::BlurHovered(hovered) => {
                self.blur_hovered = hovered;
            }
            Message::SaveImage => {
                let Some(frame) = self.editor.frame().cloned() else {
                    return Task::none();
                };
                let suggested = self
                    .editor
                    .store()
                    .source_path()
                    .map(default_output_path);
                let revision = self.editor.revision();
                self.busy = true;
                return Task::perform(pick_and_encode(frame, suggested), move |result| {
                    Message::Saved(revision, result)
                });
            }
            Message::Saved(revision, result) => {
                self.busy = false;
                match result {
                    Ok(Some(path)) => {
                        self.editor.mark_saved(revision);
                        self.status = format!("Saved {}", path.display());
                    }
                    Ok(None) => {}
                    Err(e) => {
                        log::error!("Save failed: {e}");
                        self.status = format!("Could not save image: {e}");
                    }
                }
            }
            Message::BlurStrengthChanged(strength) => {
                self.settings.blur_strength = strength;
                let (blurrer, warning) = build_blurrer(self.settings.blur_settings());
                self.editor.set_blurrer(blurrer);
                if let Some(warning) = warning {
                    self.status = warning;
                }
            }
            Message::KeepEmptyRegionsChanged(keep) => {
                self.settings.keep_empty_regions = keep;
                self.editor.set_policy(self.settings.empty_region_policy());
            }
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
            }
            Message::HighContrastChanged(enabled) => {
                self.settings.high_contrast = enabled;
            }
            Message::OpenSettingsFolder => {
                if let Some(dir) = dirs::config_dir().map(|d| d.join("FaceBlur")) {
                    if let Err(e) = std::fs::create_dir_all(&dir).and_then(|_| open::that(&dir)) {
                        log::warn!("Could not open {}: {e}", dir.display());
                    }
                }
            }
            Message::PollSystemTheme => {
                // Theme is resolved fresh in theme() on every render,
                // so just requesting a redraw is enough.
            }
        }
        Task::none()
    }

    fn install(&mut self, loaded: LoadedImage) {
        let (w, h) = (loaded.frame.width(), loaded.frame.height());
        let name = loaded
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.editor.install(loaded.frame, Some(loaded.path));
        self.editor.set_view(ViewTransform::fit(
            w,
            h,
            self.settings.max_canvas_width,
            self.settings.max_canvas_height,
        ));
        self.refresh_preview();
        self.selecting = false;
        self.active_tab = Tab::Editor;
        self.status = format!("Opened {name} ({w}\u{00d7}{h}). Press Select to start marking.");
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        if !self.selecting {
            return;
        }
        match event {
            PointerEvent::Pressed(p) => self.editor.pointer_pressed(p.x, p.y),
            PointerEvent::Moved(p) => self.editor.pointer_moved(p.x, p.y),
            PointerEvent::Released(p) => match self.editor.pointer_released(p.x, p.y) {
                Some(region) => {
                    let pending = self.editor.selection().map_or(0, |s| s.pending().len());
                    self.status = format!("Selected {region}, {pending} awaiting Confirm.");
                }
                None => {
                    self.status = "Ignored an empty rectangle.".into();
                }
            },
        }
    }

    fn refresh_preview(&mut self) {
        self.preview = self
            .editor
            .frame()
            .map(|f| image::Handle::from_rgba(f.width(), f.height(), f.to_rgba()));
    }

    pub fn view(&self) -> Element<'_, Message> {
        let fs = self.settings.font_scale;

        // Tab bar
        let tab_bar = row(Tab::ALL
            .iter()
            .map(|&tab| {
                let label = text(tab.label()).size(scaled(13.0, fs));
                let btn = button(label)
                    .on_press(Message::TabSelected(tab))
                    .padding([6, 14]);
                if tab == self.active_tab {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>())
        .spacing(2);

        // Tab content
        let content: Element<'_, Message> = match self.active_tab {
            Tab::Editor => tabs::editor_tab::view(EditorTab {
                font_scale: fs,
                editor: &self.editor,
                preview: self.preview.as_ref(),
                selecting: self.selecting,
                blur_hovered: self.blur_hovered,
                busy: self.busy,
            }),
            Tab::Settings => scrollable(tabs::settings_tab::view(&self.settings)).into(),
            Tab::About => scrollable(tabs::about_tab::view(fs)).into(),
        };

        let tab_content = container(content).padding(16).height(Length::Fill);

        // Status line
        let dirty = if self.editor.store().is_dirty() {
            " \u{2022} unsaved changes"
        } else {
            ""
        };
        let footer = container(
            text(format!("{}{dirty}", self.status))
                .size(scaled(12.0, fs))
                .style(|theme: &Theme| text::Style {
                    color: Some(theme::muted_color(theme)),
                }),
        )
        .width(Length::Fill)
        .padding([6, 16]);

        column![tab_bar, tab_content, footer]
            .spacing(0)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance, self.settings.high_contrast)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        if self.settings.appearance == Appearance::System {
            iced::time::every(Duration::from_secs(2)).map(|_| Message::PollSystemTheme)
        } else {
            Subscription::none()
        }
    }
}

/// Scale a base font size by the user's font_scale setting.
pub fn scaled(base: f32, font_scale: f32) -> f32 {
    (base * font_scale).round()
}

/// Builds the blurrer for `settings`, falling back to the default preset
/// when they are invalid. The second value is a message for the status line.
fn build_blurrer(settings: BlurSettings) -> (Box<dyn FrameBlurrer>, Option<String>) {
    match create_blurrer(settings) {
        Ok(blurrer) => (blurrer, None),
        Err(e) => {
            log::warn!("{e}, using the default blur");
            (
                Box::new(CpuRectangularBlurrer::new(BlurSettings::default())),
                Some(format!("{e}. Using the default blur instead.")),
            )
        }
    }
}

fn decode(path: PathBuf) -> Result<Option<LoadedImage>, String> {
    let frame = ImageFileReader::new()
        .read(&path)
        .map_err(|e| e.to_string())?;
    Ok(Some(LoadedImage { path, frame }))
}

async fn pick_and_decode() -> Result<Option<LoadedImage>, String> {
    let Some(handle) = rfd::AsyncFileDialog::new()
        .set_title("Open image")
        .add_filter("Image files", OPEN_EXTENSIONS)
        .pick_file()
        .await
    else {
        return Ok(None);
    };
    decode(handle.path().to_path_buf())
}

async fn pick_and_encode(
    frame: Frame,
    suggested: Option<PathBuf>,
) -> Result<Option<PathBuf>, String> {
    let mut dialog = rfd::AsyncFileDialog::new()
        .set_title("Save blurred image")
        .add_filter("PNG image", &[DEFAULT_SAVE_EXTENSION]);
    if let Some(suggested) = suggested {
        if let Some(dir) = suggested.parent() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(name) = suggested.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
    }
    let Some(handle) = dialog.save_file().await else {
        return Ok(None);
    };

    let path = with_default_extension(handle.path().to_path_buf());
    ImageFileWriter::new()
        .write(&path, &frame)
        .map_err(|e| e.to_string())?;
    Ok(Some(path))
}

fn with_default_extension(mut path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.set_extension(DEFAULT_SAVE_EXTENSION);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scaled_rounds() {
        assert_relative_eq!(scaled(13.0, 1.0), 13.0);
        assert_relative_eq!(scaled(13.0, 1.25), 16.0);
    }

    #[test]
    fn test_missing_extension_defaults_to_png() {
        assert_eq!(
            with_default_extension(PathBuf::from("out")),
            PathBuf::from("out.png")
        );
        assert_eq!(
            with_default_extension(PathBuf::from("out.jpg")),
            PathBuf::from("out.jpg")
        );
    }

    #[test]
    fn test_invalid_custom_settings_fall_back() {
        let (_, warning) = build_blurrer(BlurSettings {
            kernel_size: 4,
            sigma: 1.0,
        });
        assert!(warning.is_some());
        let (_, warning) = build_blurrer(BlurSettings::default());
        assert!(warning.is_none());
    }

    #[test]
    fn test_decode_missing_file_reports_error() {
        assert!(decode(PathBuf::from("/nonexistent/in.png")).is_err());
    }

    fn app_with_blurred_image() -> App {
        let (mut app, _) = App::with_settings(Settings::default(), None);
        let _ = app.update(Message::ImageLoaded(Ok(Some(LoadedImage {
            path: PathBuf::from("in.png"),
            frame: Frame::solid(60, 40, [10, 200, 30]),
        }))));
        select_and_blur(&mut app, (5.0, 5.0), (20.0, 20.0));
        app
    }

    fn select_and_blur(app: &mut App, from: (f32, f32), to: (f32, f32)) {
        let _ = app.update(Message::StartSelecting);
        let _ = app.update(Message::Pointer(PointerEvent::Pressed(iced::Point::new(from.0, from.1))));
        let _ = app.update(Message::Pointer(PointerEvent::Released(iced::Point::new(to.0, to.1))));
        let _ = app.update(Message::ConfirmSelection);
        let _ = app.update(Message::ApplyBlur);
    }

    #[test]
    fn test_blur_is_ignored_while_saving() {
        let mut app = app_with_blurred_image();
        let _ = app.update(Message::SaveImage);
        assert!(app.busy);

        let before = app.editor.revision();
        select_and_blur(&mut app, (30.0, 10.0), (50.0, 30.0));
        assert_eq!(app.editor.revision(), before);
        assert!(app.editor.can_blur());

        let _ = app.update(Message::Saved(before, Ok(Some(PathBuf::from("out.png")))));
        assert!(!app.busy);
        assert!(!app.editor.store().is_dirty());
    }

    #[test]
    fn test_save_of_older_revision_keeps_image_dirty() {
        let mut app = app_with_blurred_image();
        let saved_at = app.editor.revision();
        select_and_blur(&mut app, (30.0, 10.0), (50.0, 30.0));

        let _ = app.update(Message::Saved(saved_at, Ok(Some(PathBuf::from("out.png")))));
        assert!(app.editor.store().is_dirty());
    }

    #[test]
    fn test_clear_selection_disables_blur() {
        let (mut app, _) = App::with_settings(Settings::default(), None);
        let _ = app.update(Message::ImageLoaded(Ok(Some(LoadedImage {
            path: PathBuf::from("in.png"),
            frame: Frame::solid(60, 40, [0, 0, 0]),
        }))));
        let _ = app.update(Message::StartSelecting);
        let _ = app.update(Message::Pointer(PointerEvent::Pressed(iced::Point::new(1.0, 1.0))));
        let _ = app.update(Message::Pointer(PointerEvent::Released(iced::Point::new(9.0, 9.0))));
        let _ = app.update(Message::ConfirmSelection);
        assert!(app.editor.can_blur());

        let _ = app.update(Message::ClearSelection);
        assert!(!app.editor.can_blur());
    }
}
