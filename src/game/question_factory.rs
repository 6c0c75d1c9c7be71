use std::cell::Cell;
use std::rc::Rc;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::scheduler::Scheduler;
use crate::error::QuestionFactoryError;
use crate::model::{mock_questions, QuestionOrder, QuizQuestion};

/// Hands out questions one at a time, delivering each on the next scheduler
/// tick. Only one request may be outstanding.
pub struct QuestionFactory {
    questions: Vec<QuizQuestion>,
    order: QuestionOrder,
    rng: StdRng,
    next_index: usize,
    scheduler: Rc<dyn Scheduler>,
    in_flight: Rc<Cell<bool>>,
}

impl QuestionFactory {
    pub fn new(
        questions: Vec<QuizQuestion>,
        order: QuestionOrder,
        seed: Option<u64>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        debug!(target: "question_factory", "Question order: {:?}; seed: {}", order, seed);
        Self {
            questions,
            order,
            rng: StdRng::seed_from_u64(seed),
            next_index: 0,
            scheduler,
            in_flight: Rc::new(Cell::new(false)),
        }
    }

    pub fn with_mock_questions(
        order: QuestionOrder,
        seed: Option<u64>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self::new(mock_questions(), order, seed, scheduler)
    }

    pub fn has_request_in_flight(&self) -> bool {
        self.in_flight.get()
    }

    /// `on_next` fires exactly once per accepted request; `None` means the
    /// factory has nothing to offer.
    pub fn request_next_question<F>(&mut self, on_next: F) -> Result<(), QuestionFactoryError>
    where
        F: FnOnce(Option<QuizQuestion>) + 'static,
    {
        if self.in_flight.get() {
            return Err(QuestionFactoryError::RequestInFlight);
        }
        self.in_flight.set(true);

        let question = self.next_question();
        trace!(target: "question_factory", "Selected question: {:?}", question.as_ref().map(|q| &q.image));

        let in_flight = Rc::clone(&self.in_flight);
        self.scheduler.defer(Box::new(move || {
            in_flight.set(false);
            on_next(question);
        }));
        Ok(())
    }

    fn next_question(&mut self) -> Option<QuizQuestion> {
        if self.questions.is_empty() {
            return None;
        }
        let index = match self.order {
            QuestionOrder::Random => self.rng.random_range(0..self.questions.len()),
            QuestionOrder::Sequential => {
                let index = self.next_index % self.questions.len();
                self.next_index = index + 1;
                index
            }
        };
        self.questions.get(index).cloned()
    }
}
