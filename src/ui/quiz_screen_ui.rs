use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{Align, Button, ContentFit, Frame, Label, Orientation, Picture};
use log::{trace, warn};

use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventHandler, EventObserver, Unsubscriber};
use crate::game::Settings;
use crate::model::{QuizCommand, QuizEngineEvent, QuizStep};

const CORRECT_CLASS: &str = "answer-correct";
const INCORRECT_CLASS: &str = "answer-incorrect";
const CLEARED_CLASS: &str = "answer-cleared";

/// The single quiz screen: counter, poster, question and the two answer
/// buttons. Renders engine events and turns clicks into commands.
pub struct QuizScreenUI {
    pub container: gtk4::Box,
    counter_label: Label,
    poster_frame: Frame,
    poster: Picture,
    question_label: Label,
    no_button: Button,
    yes_button: Button,
    settings: Settings,
    subscription: Option<Unsubscriber<QuizEngineEvent>>,
}

impl Destroyable for QuizScreenUI {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl EventHandler<QuizEngineEvent> for QuizScreenUI {
    fn handle_event(&mut self, event: &QuizEngineEvent) {
        match event {
            QuizEngineEvent::QuestionShown(step) => self.show_step(step),
            QuizEngineEvent::AnswerRevealed { is_correct } => self.show_answer_result(*is_correct),
            QuizEngineEvent::AnswerFeedbackCleared => self.clear_answer_result(),
            QuizEngineEvent::RoundCompleted(_) => self.set_buttons_enabled(false),
            QuizEngineEvent::RoundRestarted => {
                self.clear_answer_result();
                self.set_buttons_enabled(false);
                self.counter_label.set_label("");
                self.question_label.set_label("");
            }
        }
    }
}

impl QuizScreenUI {
    pub fn new(
        settings: &Settings,
        quiz_command_emitter: EventEmitter<QuizCommand>,
        quiz_engine_event_observer: EventObserver<QuizEngineEvent>,
    ) -> Rc<RefCell<Self>> {
        let container = gtk4::Box::builder()
            .orientation(Orientation::Vertical)
            .spacing(20)
            .margin_start(20)
            .margin_end(20)
            .margin_top(10)
            .margin_bottom(20)
            .build();

        let header = gtk4::Box::builder()
            .orientation(Orientation::Horizontal)
            .build();
        let title_label = Label::builder()
            .label("Вопрос:")
            .css_classes(["quiz-caption"])
            .hexpand(true)
            .halign(Align::Start)
            .build();
        let counter_label = Label::builder()
            .css_classes(["quiz-caption"])
            .halign(Align::End)
            .build();
        header.append(&title_label);
        header.append(&counter_label);

        let poster = Picture::builder()
            .content_fit(ContentFit::Cover)
            .can_shrink(true)
            .vexpand(true)
            .build();
        let poster_frame = Frame::builder()
            .css_classes(["poster-frame"])
            .child(&poster)
            .overflow(gtk4::Overflow::Hidden)
            .vexpand(true)
            .build();

        let question_label = Label::builder()
            .css_classes(["quiz-question"])
            .justify(gtk4::Justification::Center)
            .wrap(true)
            .lines(2)
            .build();

        let buttons = gtk4::Box::builder()
            .orientation(Orientation::Horizontal)
            .spacing(20)
            .homogeneous(true)
            .build();
        let no_button = Button::builder()
            .label("Нет")
            .css_classes(["answer-button"])
            .sensitive(false)
            .build();
        let yes_button = Button::builder()
            .label("Да")
            .css_classes(["answer-button"])
            .sensitive(false)
            .build();
        buttons.append(&no_button);
        buttons.append(&yes_button);

        container.append(&header);
        container.append(&poster_frame);
        container.append(&question_label);
        container.append(&buttons);

        no_button.connect_clicked({
            let quiz_command_emitter = quiz_command_emitter.clone();
            move |_| quiz_command_emitter.emit(QuizCommand::Answer(false))
        });
        yes_button.connect_clicked(move |_| quiz_command_emitter.emit(QuizCommand::Answer(true)));

        let screen = Rc::new(RefCell::new(Self {
            container,
            counter_label,
            poster_frame,
            poster,
            question_label,
            no_button,
            yes_button,
            settings: settings.clone(),
            subscription: None,
        }));

        let handler = Rc::downgrade(&screen);
        let subscription = quiz_engine_event_observer.subscribe(move |event| {
            if let Some(screen) = handler.upgrade() {
                screen.borrow_mut().handle_event(event);
            }
        });
        screen.borrow_mut().subscription = Some(subscription);
        screen
    }

    fn show_step(&mut self, step: &QuizStep) {
        trace!(target: "quiz_screen", "Rendering {}", step.question_number);
        self.question_label.set_label(&step.question);
        self.counter_label.set_label(&step.question_number);
        self.show_poster(&self.settings.poster_path(&step.image));
        self.poster_frame.remove_css_class(CLEARED_CLASS);
        self.set_buttons_enabled(true);
    }

    fn show_poster(&self, path: &Path) {
        if path.exists() {
            self.poster.set_filename(Some(path));
        } else {
            warn!(target: "quiz_screen", "Missing poster {}", path.display());
            self.poster.set_filename(None::<&Path>);
        }
    }

    fn show_answer_result(&mut self, is_correct: bool) {
        self.set_buttons_enabled(false);
        self.poster_frame.add_css_class(if is_correct {
            CORRECT_CLASS
        } else {
            INCORRECT_CLASS
        });
    }

    fn clear_answer_result(&self) {
        self.poster_frame.remove_css_class(CORRECT_CLASS);
        self.poster_frame.remove_css_class(INCORRECT_CLASS);
        self.poster_frame.add_css_class(CLEARED_CLASS);
    }

    fn set_buttons_enabled(&self, enabled: bool) {
        self.no_button.set_sensitive(enabled);
        self.yes_button.set_sensitive(enabled);
    }
}
