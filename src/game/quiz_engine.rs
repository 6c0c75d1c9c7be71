use log::{debug, error, info, trace, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use super::question_factory::QuestionFactory;
use super::quiz_session::{QuizSession, RoundProgress};
use super::scheduler::{CancellationToken, Scheduler};
use super::statistic_service::StatisticService;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventHandler, EventObserver, Unsubscriber};
use crate::model::{AlertModel, QuizCommand, QuizEngineEvent, QuizQuestion, QuizStep};

const ROUND_OVER_TITLE: &str = "Этот раунд окончен!";
const PLAY_AGAIN_TEXT: &str = "Сыграть ещё раз";

/// Drives a quiz round: asks the factory for questions, scores answers, waits
/// out the feedback delay and records finished rounds.
pub struct QuizEngine {
    session: QuizSession,
    question_factory: QuestionFactory,
    statistic_service: StatisticService,
    scheduler: Rc<dyn Scheduler>,
    answer_delay: Duration,
    current_question: Option<QuizQuestion>,
    pending_transition: Option<CancellationToken>,
    quiz_engine_event_emitter: EventEmitter<QuizEngineEvent>,
    subscription: Option<Unsubscriber<QuizCommand>>,
    self_ref: Weak<RefCell<QuizEngine>>,
}

impl Destroyable for QuizEngine {
    fn destroy(&mut self) {
        self.cancel_pending_transition();
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl EventHandler<QuizCommand> for QuizEngine {
    fn handle_event(&mut self, command: &QuizCommand) {
        self.handle_command(*command);
    }
}

impl QuizEngine {
    pub fn new(
        quiz_command_observer: EventObserver<QuizCommand>,
        quiz_engine_event_emitter: EventEmitter<QuizEngineEvent>,
        session: QuizSession,
        question_factory: QuestionFactory,
        statistic_service: StatisticService,
        scheduler: Rc<dyn Scheduler>,
        answer_delay: Duration,
    ) -> Rc<RefCell<Self>> {
        let engine = Rc::new_cyclic(|self_ref| {
            RefCell::new(Self {
                session,
                question_factory,
                statistic_service,
                scheduler,
                answer_delay,
                current_question: None,
                pending_transition: None,
                quiz_engine_event_emitter,
                subscription: None,
                self_ref: self_ref.clone(),
            })
        });
        QuizEngine::wire_subscription(&engine, quiz_command_observer);
        engine
    }

    fn wire_subscription(
        engine: &Rc<RefCell<Self>>,
        quiz_command_observer: EventObserver<QuizCommand>,
    ) {
        let handler = Rc::downgrade(engine);
        let subscription = quiz_command_observer.subscribe(move |command| {
            if let Some(engine) = handler.upgrade() {
                engine.borrow_mut().handle_event(command);
            }
        });
        engine.borrow_mut().subscription = Some(subscription);
    }

    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.current_question.as_ref()
    }

    pub fn statistic_service(&self) -> &StatisticService {
        &self.statistic_service
    }

    pub fn has_pending_transition(&self) -> bool {
        self.pending_transition.is_some()
    }

    fn handle_command(&mut self, command: QuizCommand) {
        trace!(target: "quiz_engine", "Handling command: {:?}", command);
        match command {
            QuizCommand::Start => self.request_question(),
            QuizCommand::Answer(given_answer) => self.handle_answer(given_answer),
            QuizCommand::Restart => self.restart(),
        }
    }

    fn request_question(&mut self) {
        if self.pending_transition.is_some() {
            trace!(target: "quiz_engine", "Feedback delay running; next question comes after it");
            return;
        }
        if self.current_question.is_some() || self.question_factory.has_request_in_flight() {
            trace!(target: "quiz_engine", "Question already shown or on its way");
            return;
        }
        let engine = self.self_ref.clone();
        let result = self.question_factory.request_next_question(move |question| {
            if let Some(engine) = engine.upgrade() {
                engine.borrow_mut().did_receive_next_question(question);
            }
        });
        if let Err(err) = result {
            warn!(target: "quiz_engine", "Could not request a question: {}", err);
        }
    }

    fn did_receive_next_question(&mut self, question: Option<QuizQuestion>) {
        let Some(question) = question else {
            warn!(target: "quiz_engine", "Question factory delivered no question");
            return;
        };
        let step = self.convert(&question);
        debug!(
            target: "quiz_engine",
            "Showing question {}: {}",
            step.question_number,
            question.image
        );
        self.current_question = Some(question);
        self.quiz_engine_event_emitter
            .emit(QuizEngineEvent::QuestionShown(step));
    }

    fn convert(&self, question: &QuizQuestion) -> QuizStep {
        QuizStep {
            image: question.image.clone(),
            question: question.text.clone(),
            question_number: self.session.question_number(),
        }
    }

    fn handle_answer(&mut self, given_answer: bool) {
        if self.pending_transition.is_some() {
            trace!(target: "quiz_engine", "Ignoring answer during feedback delay");
            return;
        }
        let Some(question) = self.current_question.take() else {
            trace!(target: "quiz_engine", "Ignoring answer with no question shown");
            return;
        };

        let is_correct = given_answer == question.correct_answer;
        self.session.record_answer(is_correct);
        self.quiz_engine_event_emitter
            .emit(QuizEngineEvent::AnswerRevealed { is_correct });

        let engine = self.self_ref.clone();
        let token = self.scheduler.schedule(
            self.answer_delay,
            Box::new(move || {
                if let Some(engine) = engine.upgrade() {
                    engine.borrow_mut().show_next_question_or_results();
                }
            }),
        );
        self.pending_transition = Some(token);
    }

    fn show_next_question_or_results(&mut self) {
        self.pending_transition = None;
        self.quiz_engine_event_emitter
            .emit(QuizEngineEvent::AnswerFeedbackCleared);

        match self.session.advance() {
            RoundProgress::NextQuestion(_) => self.request_question(),
            RoundProgress::RoundFinished { correct, total } => self.finish_round(correct, total),
        }
    }

    fn finish_round(&mut self, correct: u32, total: u32) {
        info!(target: "quiz_engine", "Round finished: {}/{}", correct, total);
        if let Err(err) = self.statistic_service.store(correct, total) {
            error!(target: "quiz_engine", "Could not record round statistics: {}", err);
        }

        let alert = AlertModel {
            title: ROUND_OVER_TITLE.to_string(),
            message: self.results_message(correct, total),
            button_text: PLAY_AGAIN_TEXT.to_string(),
            completion: Some(self.next_round_completion()),
        };
        self.session.reset();
        self.quiz_engine_event_emitter
            .emit(QuizEngineEvent::RoundCompleted(alert));
    }

    fn next_round_completion(&self) -> Rc<dyn Fn()> {
        let engine = self.self_ref.clone();
        Rc::new(move || {
            if let Some(engine) = engine.upgrade() {
                engine.borrow_mut().request_question();
            }
        })
    }

    fn results_message(&self, correct: u32, total: u32) -> String {
        let statistics = &self.statistic_service;
        let best_game = statistics.best_game();
        format!(
            "Ваш результат: {}/{}\nКоличество сыгранных квизов: {}\nРекорд: {}/{} ({})\nСредняя точность: {:.2}%",
            correct,
            total,
            statistics.games_count(),
            best_game.correct,
            best_game.total,
            best_game.formatted_date(),
            statistics.total_accuracy()
        )
    }

    fn restart(&mut self) {
        info!(target: "quiz_engine", "Restarting round");
        self.cancel_pending_transition();
        self.session.reset();
        self.current_question = None;
        self.quiz_engine_event_emitter
            .emit(QuizEngineEvent::RoundRestarted);
        self.request_question();
    }

    fn cancel_pending_transition(&mut self) {
        if let Some(token) = self.pending_transition.take() {
            trace!(target: "quiz_engine", "Cancelling pending transition");
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::events::Channel;
    use crate::game::key_value_store::{InMemoryStore, KeyValueStore};
    use crate::game::scheduler::ManualScheduler;
    use crate::model::QuestionOrder;
    use crate::tests::UsingLogger;
    use serde_json::Value;
    use test_context::test_context;

    const DELAY: Duration = Duration::from_secs(1);

    struct Harness {
        scheduler: ManualScheduler,
        commands: EventEmitter<QuizCommand>,
        events: Rc<RefCell<Vec<QuizEngineEvent>>>,
        engine: Rc<RefCell<QuizEngine>>,
    }

    impl Harness {
        fn new(questions_amount: usize) -> Self {
            Self::with_store(questions_amount, Box::new(InMemoryStore::new()))
        }

        fn with_store(questions_amount: usize, store: Box<dyn KeyValueStore>) -> Self {
            let scheduler = ManualScheduler::new();
            let (command_emitter, command_observer) = Channel::<QuizCommand>::new();
            let (event_emitter, event_observer) = Channel::<QuizEngineEvent>::new();

            let events = Rc::new(RefCell::new(Vec::new()));
            let events_clone = events.clone();
            event_observer.subscribe(move |event: &QuizEngineEvent| {
                events_clone.borrow_mut().push(event.clone());
            });

            let shared_scheduler: Rc<dyn Scheduler> = Rc::new(scheduler.clone());
            let engine = QuizEngine::new(
                command_observer,
                event_emitter,
                QuizSession::new(questions_amount),
                QuestionFactory::with_mock_questions(
                    QuestionOrder::Sequential,
                    None,
                    shared_scheduler.clone(),
                ),
                StatisticService::new(store),
                shared_scheduler,
                DELAY,
            );

            Self {
                scheduler,
                commands: command_emitter,
                events,
                engine,
            }
        }

        fn start(&self) {
            self.commands.emit(QuizCommand::Start);
            self.scheduler.run_until_idle();
        }

        fn correct_answer(&self) -> bool {
            self.engine
                .borrow()
                .current_question()
                .map(|question| question.correct_answer)
                .expect("a question should be shown")
        }

        fn answer_and_wait(&self, correct: bool) {
            let answer = self.correct_answer();
            self.commands
                .emit(QuizCommand::Answer(if correct { answer } else { !answer }));
            self.scheduler.advance(DELAY);
        }

        fn shown_steps(&self) -> Vec<QuizStep> {
            self.events
                .borrow()
                .iter()
                .filter_map(|event| match event {
                    QuizEngineEvent::QuestionShown(step) => Some(step.clone()),
                    _ => None,
                })
                .collect()
        }

        fn alerts(&self) -> Vec<AlertModel> {
            self.events
                .borrow()
                .iter()
                .filter_map(|event| match event {
                    QuizEngineEvent::RoundCompleted(alert) => Some(alert.clone()),
                    _ => None,
                })
                .collect()
        }

        fn revealed(&self) -> Vec<bool> {
            self.events
                .borrow()
                .iter()
                .filter_map(|event| match event {
                    QuizEngineEvent::AnswerRevealed { is_correct } => Some(*is_correct),
                    _ => None,
                })
                .collect()
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Option<Value> {
            None
        }

        fn set_all(&mut self, _entries: Vec<(String, Value)>) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }
    }

    #[test]
    fn test_start_shows_first_question_on_next_tick() {
        let harness = Harness::new(10);
        harness.commands.emit(QuizCommand::Start);
        assert!(harness.shown_steps().is_empty());

        harness.scheduler.run_until_idle();
        let steps = harness.shown_steps();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].image, "The Godfather");
        assert_eq!(steps[0].question, "Рейтинг этого фильма больше чем 6?");
        assert_eq!(steps[0].question_number, "1/10");
    }

    #[test]
    fn test_repeated_start_requests_one_question() {
        let harness = Harness::new(10);
        harness.commands.emit(QuizCommand::Start);
        harness.commands.emit(QuizCommand::Start);
        harness.scheduler.run_until_idle();
        harness.commands.emit(QuizCommand::Start);
        harness.scheduler.run_until_idle();

        assert_eq!(harness.shown_steps().len(), 1);
    }

    #[test]
    fn test_start_during_feedback_delay_keeps_numbering() {
        let harness = Harness::new(10);
        harness.start();

        let answer = harness.correct_answer();
        harness.commands.emit(QuizCommand::Answer(answer));
        harness.commands.emit(QuizCommand::Start);
        harness.scheduler.run_until_idle();
        assert_eq!(harness.shown_steps().len(), 1);
        assert!(harness.engine.borrow().current_question().is_none());

        harness.scheduler.advance(DELAY);
        harness.answer_and_wait(true);

        let numbers: Vec<String> = harness
            .shown_steps()
            .into_iter()
            .map(|step| step.question_number)
            .collect();
        assert_eq!(numbers, vec!["1/10", "2/10", "3/10"]);
    }

    #[test]
    fn test_stale_alert_completion_during_delay_is_ignored() {
        let harness = Harness::new(1);
        harness.start();
        harness.answer_and_wait(true);
        let alert = harness.alerts().remove(0);

        alert.complete();
        harness.scheduler.run_until_idle();
        let answer = harness.correct_answer();
        harness.commands.emit(QuizCommand::Answer(answer));

        alert.complete();
        harness.scheduler.run_until_idle();
        assert_eq!(harness.shown_steps().len(), 2);

        harness.scheduler.advance(DELAY);
        assert_eq!(harness.alerts().len(), 2);
        assert_eq!(harness.shown_steps().len(), 2);
    }

    #[test]
    fn test_answer_reveals_then_advances_after_delay() {
        let harness = Harness::new(10);
        harness.start();

        let answer = harness.correct_answer();
        harness.commands.emit(QuizCommand::Answer(answer));
        assert_eq!(harness.revealed(), vec![true]);
        assert!(harness.engine.borrow().has_pending_transition());

        harness.scheduler.advance(Duration::from_millis(500));
        assert_eq!(harness.shown_steps().len(), 1);

        harness.scheduler.advance(Duration::from_millis(500));
        let steps = harness.shown_steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].question_number, "2/10");
        assert_eq!(harness.engine.borrow().session().correct_answers(), 1);
        assert!(harness
            .events
            .borrow()
            .iter()
            .any(|event| matches!(event, QuizEngineEvent::AnswerFeedbackCleared)));
    }

    #[test]
    fn test_answers_during_delay_are_ignored() {
        let harness = Harness::new(10);
        harness.start();

        let answer = harness.correct_answer();
        harness.commands.emit(QuizCommand::Answer(answer));
        harness.commands.emit(QuizCommand::Answer(answer));
        harness.commands.emit(QuizCommand::Answer(!answer));

        assert_eq!(harness.revealed(), vec![true]);
        assert_eq!(harness.engine.borrow().session().correct_answers(), 1);
    }

    #[test]
    fn test_answer_without_question_is_ignored() {
        let harness = Harness::new(10);
        harness.commands.emit(QuizCommand::Answer(true));

        assert!(harness.revealed().is_empty());
        assert_eq!(harness.scheduler.pending_count(), 0);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_full_round_records_statistics(_ctx: &mut UsingLogger) {
        let harness = Harness::new(10);
        harness.start();

        for index in 0..10 {
            harness.answer_and_wait(index < 7);
        }

        let alerts = harness.alerts();
        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.title, "Этот раунд окончен!");
        assert_eq!(alert.button_text, "Сыграть ещё раз");
        assert!(alert.message.contains("Ваш результат: 7/10"));
        assert!(alert.message.contains("Количество сыгранных квизов: 1"));
        assert!(alert.message.contains("Рекорд: 7/10"));
        assert!(alert.message.contains("Средняя точность: 70.00%"));

        let engine = harness.engine.borrow();
        assert_eq!(engine.statistic_service().games_count(), 1);
        assert_eq!(engine.statistic_service().best_game().correct, 7);
        assert_eq!(engine.session().current_question_index(), 0);
        assert_eq!(engine.session().correct_answers(), 0);
        assert!(engine.current_question().is_none());
    }

    #[test]
    fn test_alert_completion_starts_next_round() {
        let harness = Harness::new(3);
        harness.start();
        for _ in 0..3 {
            harness.answer_and_wait(true);
        }
        assert_eq!(harness.shown_steps().len(), 3);
        // nothing is requested until the summary is dismissed
        assert_eq!(harness.scheduler.pending_count(), 0);

        let alert = harness.alerts().remove(0);
        alert.complete();
        harness.scheduler.run_until_idle();

        let steps = harness.shown_steps();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[3].question_number, "1/3");
    }

    #[test]
    fn test_two_rounds_accumulate() {
        let harness = Harness::new(10);
        harness.start();
        for index in 0..10 {
            harness.answer_and_wait(index < 9);
        }
        harness.alerts()[0].complete();
        harness.scheduler.run_until_idle();
        for index in 0..10 {
            harness.answer_and_wait(index < 3);
        }

        let alerts = harness.alerts();
        assert_eq!(alerts.len(), 2);
        assert!(alerts[1].message.contains("Ваш результат: 3/10"));
        assert!(alerts[1].message.contains("Количество сыгранных квизов: 2"));
        assert!(alerts[1].message.contains("Рекорд: 9/10"));
        assert!(alerts[1].message.contains("Средняя точность: 60.00%"));
    }

    #[test]
    fn test_restart_cancels_pending_transition() {
        let harness = Harness::new(10);
        harness.start();
        harness.answer_and_wait(true);

        let answer = harness.correct_answer();
        harness.commands.emit(QuizCommand::Answer(answer));
        harness.commands.emit(QuizCommand::Restart);
        assert!(!harness.engine.borrow().has_pending_transition());

        harness.scheduler.advance(DELAY * 2);

        let events = harness.events.borrow();
        let cleared = events
            .iter()
            .filter(|event| matches!(event, QuizEngineEvent::AnswerFeedbackCleared))
            .count();
        assert_eq!(cleared, 1);
        assert!(events
            .iter()
            .any(|event| matches!(event, QuizEngineEvent::RoundRestarted)));
        drop(events);

        let steps = harness.shown_steps();
        assert_eq!(steps.last().unwrap().question_number, "1/10");
        assert_eq!(harness.engine.borrow().session().correct_answers(), 0);
        assert!(harness.alerts().is_empty());
    }

    #[test]
    fn test_storage_failure_still_shows_summary() {
        let harness = Harness::with_store(2, Box::new(BrokenStore));
        harness.start();
        harness.answer_and_wait(true);
        harness.answer_and_wait(false);

        let alerts = harness.alerts();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].message.contains("Ваш результат: 1/2"));
        assert!(alerts[0].message.contains("Количество сыгранных квизов: 0"));
        assert_eq!(harness.engine.borrow().session().current_question_index(), 0);
    }

    #[test]
    fn test_destroy_stops_command_handling() {
        let harness = Harness::new(10);
        harness.start();
        let answer = harness.correct_answer();
        harness.commands.emit(QuizCommand::Answer(answer));

        harness.engine.borrow_mut().destroy();
        harness.scheduler.advance(DELAY);
        harness.commands.emit(QuizCommand::Restart);

        assert_eq!(harness.shown_steps().len(), 1);
        assert!(!harness
            .events
            .borrow()
            .iter()
            .any(|event| matches!(event, QuizEngineEvent::RoundRestarted)));
    }
}
