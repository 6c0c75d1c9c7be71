use super::{AlertModel, QuizStep};

#[derive(Debug, Clone)]
pub enum QuizEngineEvent {
    QuestionShown(QuizStep),
    AnswerRevealed { is_correct: bool },
    AnswerFeedbackCleared,
    RoundCompleted(AlertModel),
    RoundRestarted,
}
