pub mod alert_presenter;
pub mod glib_scheduler;
pub mod quiz_screen_ui;
pub mod window;

pub use alert_presenter::AlertPresenter;
pub use glib_scheduler::GlibScheduler;
pub use quiz_screen_ui::QuizScreenUI;
