use gtk4::prelude::*;
use gtk4::Application;
use moviequiz::ui;

const APP_ID: &str = "org.moviequiz.MovieQuiz";

fn init_logging() {
    env_logger::init();
}

fn main() -> glib::ExitCode {
    init_logging();

    // Register the compiled stylesheet before any window asks for it
    gio::resources_register_include!("compiled.gresource")
        .expect("Failed to register compiled resources.");

    let app = Application::builder().application_id(APP_ID).build();

    app.connect_activate(ui::window::build_ui);

    app.run()
}
