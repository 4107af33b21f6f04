mod app;
mod settings;
mod tabs;
mod theme;
mod widgets;

use std::path::PathBuf;

use app::App;

fn main() -> iced::Result {
    env_logger::init();

    // An image path on the command line is opened at startup.
    let initial_path = std::env::args_os().nth(1).map(PathBuf::from);

    iced::application(move || App::new(initial_path.clone()), App::update, App::view)
        .title("FaceBlur")
        .theme(App::theme)
        .subscription(App::subscription)
        .window(iced::window::Settings {
            size: iced::Size::new(1180.0, 860.0),
            ..Default::default()
        })
        .run()
}
