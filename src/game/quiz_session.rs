#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundProgress {
    NextQuestion(usize),
    RoundFinished { correct: u32, total: u32 },
}

/// Progress through the current round. The engine is handed one of these
/// instead of keeping the counters as loose fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    current_question_index: usize,
    correct_answers: u32,
    questions_amount: usize,
}

impl QuizSession {
    pub fn new(questions_amount: usize) -> Self {
        Self {
            current_question_index: 0,
            correct_answers: 0,
            questions_amount: questions_amount.max(1),
        }
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    pub fn questions_amount(&self) -> usize {
        self.questions_amount
    }

    pub fn record_answer(&mut self, is_correct: bool) {
        if is_correct {
            self.correct_answers += 1;
        }
    }

    pub fn is_last_question(&self) -> bool {
        self.current_question_index + 1 >= self.questions_amount
    }

    /// Moves to the next question, or reports the finished round. A finished
    /// round keeps its counters until `reset`.
    pub fn advance(&mut self) -> RoundProgress {
        if self.is_last_question() {
            return RoundProgress::RoundFinished {
                correct: self.correct_answers,
                total: self.questions_amount as u32,
            };
        }
        self.current_question_index += 1;
        RoundProgress::NextQuestion(self.current_question_index)
    }

    pub fn reset(&mut self) {
        self.current_question_index = 0;
        self.correct_answers = 0;
    }

    pub fn question_number(&self) -> String {
        format!(
            "{}/{}",
            self.current_question_index + 1,
            self.questions_amount
        )
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_round() {
        let mut session = QuizSession::default();
        assert_eq!(session.question_number(), "1/10");

        for index in 1..10 {
            session.record_answer(index % 2 == 0);
            assert_eq!(session.advance(), RoundProgress::NextQuestion(index));
        }
        assert!(session.is_last_question());
        assert_eq!(session.question_number(), "10/10");

        session.record_answer(true);
        assert_eq!(
            session.advance(),
            RoundProgress::RoundFinished {
                correct: 5,
                total: 10
            }
        );
        // finishing does not reset on its own
        assert_eq!(session.current_question_index(), 9);
    }

    #[test]
    fn test_reset_starts_over() {
        let mut session = QuizSession::new(3);
        session.record_answer(true);
        session.advance();
        session.record_answer(true);

        session.reset();
        assert_eq!(session.current_question_index(), 0);
        assert_eq!(session.correct_answers(), 0);
        assert_eq!(session.questions_amount(), 3);
    }

    #[test]
    fn test_zero_amount_is_raised_to_one() {
        let mut session = QuizSession::new(0);
        assert!(session.is_last_question());
        session.record_answer(false);
        assert_eq!(
            session.advance(),
            RoundProgress::RoundFinished {
                correct: 0,
                total: 1
            }
        );
    }
}
