/// What the screen needs to render one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizStep {
    pub image: String,
    pub question: String,
    pub question_number: String,
}
