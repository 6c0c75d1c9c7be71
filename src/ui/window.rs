use crate::destroyable::Destroyable;
use crate::events::{Channel, EventEmitter};
use crate::game::{
    JsonFileStore, QuestionFactory, QuizEngine, QuizSession, Scheduler, Settings, StatisticService,
};
use crate::model::{QuizCommand, QuizEngineEvent};
use gio::SimpleAction;
use glib::Propagation;
use gtk4::gdk::Display;
use gtk4::{
    prelude::*, Application, ApplicationWindow, Button, CssProvider, HeaderBar,
    STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::cell::RefCell;
use std::rc::Rc;

use super::alert_presenter::AlertPresenter;
use super::glib_scheduler::GlibScheduler;
use super::quiz_screen_ui::QuizScreenUI;

const APP_VERSION: &str = env!("APP_VERSION");

fn load_stylesheet() {
    let provider = CssProvider::new();
    provider.load_from_resource("/org/moviequiz/style.css");

    match Display::default() {
        Some(display) => gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        ),
        None => log::warn!(target: "window", "No display; running unstyled"),
    }
}

fn add_restart_action(
    app: &Application,
    window: &ApplicationWindow,
    quiz_command_emitter: EventEmitter<QuizCommand>,
) {
    let action_restart = SimpleAction::new("restart", None);
    action_restart.connect_activate(move |_, _| {
        quiz_command_emitter.emit(QuizCommand::Restart);
    });
    window.add_action(&action_restart);
    app.set_accels_for_action("win.restart", &["<Control>r"]);

    let restart_button = Button::from_icon_name("view-refresh-symbolic");
    restart_button.set_tooltip_text(Some("Начать раунд заново"));
    restart_button.set_action_name(Some("win.restart"));

    let header_bar = HeaderBar::new();
    header_bar.pack_start(&restart_button);
    window.set_titlebar(Some(&header_bar));
}

pub fn build_ui(app: &Application) {
    let (quiz_command_emitter, quiz_command_observer) = Channel::<QuizCommand>::new();
    let (quiz_engine_event_emitter, quiz_engine_event_observer) = Channel::<QuizEngineEvent>::new();

    let settings = Settings::load();
    if Settings::is_debug_mode() {
        log::debug!(target: "window", "Settings: {:?}", settings);
    }

    let statistics_store = JsonFileStore::open(Settings::statistics_path());
    log::info!(
        target: "window",
        "MovieQuiz {}; statistics at {}",
        APP_VERSION,
        statistics_store.path().display()
    );

    let scheduler: Rc<dyn Scheduler> = Rc::new(GlibScheduler);
    let question_factory = QuestionFactory::with_mock_questions(
        settings.question_order,
        Settings::seed_from_env(),
        scheduler.clone(),
    );
    let quiz_engine = QuizEngine::new(
        quiz_command_observer,
        quiz_engine_event_emitter,
        QuizSession::new(settings.questions_amount()),
        question_factory,
        StatisticService::new(Box::new(statistics_store)),
        scheduler,
        settings.answer_delay(),
    );

    let window = Rc::new(
        ApplicationWindow::builder()
            .application(app)
            .title("MovieQuiz")
            .css_classes(["quiz-window"])
            .resizable(true)
            .default_width(390)
            .default_height(844)
            .build(),
    );

    let quiz_screen = QuizScreenUI::new(
        &settings,
        quiz_command_emitter.clone(),
        quiz_engine_event_observer.clone(),
    );
    window.set_child(Some(&quiz_screen.borrow().container));
    add_restart_action(app, &window, quiz_command_emitter.clone());

    let alert_presenter = AlertPresenter::new(&window);
    let alert_subscription = RefCell::new(Some(quiz_engine_event_observer.subscribe(
        move |event| {
            if let QuizEngineEvent::RoundCompleted(alert) = event {
                alert_presenter.show(alert);
            }
        },
    )));

    load_stylesheet();

    window.connect_close_request({
        let quiz_engine = quiz_engine.clone();
        let quiz_screen = quiz_screen.clone();
        move |_| {
            log::trace!(target: "window", "Closing; tearing down quiz engine");
            quiz_engine.borrow_mut().destroy();
            quiz_screen.borrow_mut().destroy();
            if let Some(subscription) = alert_subscription.borrow_mut().take() {
                subscription.unsubscribe();
            }
            Propagation::Proceed
        }
    });

    window.present();
    quiz_command_emitter.emit(QuizCommand::Start);
}
