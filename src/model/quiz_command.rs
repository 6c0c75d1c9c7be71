#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCommand {
    Start,
    Answer(bool), // the given answer: true for "yes"
    Restart,
}
