mod alert_model;
mod game_result;
mod question_order;
mod quiz_command;
mod quiz_engine_event;
mod quiz_question;
mod quiz_step;
mod statistics_record;

pub use alert_model::AlertModel;
pub use game_result::GameResult;
pub use question_order::QuestionOrder;
pub use quiz_command::QuizCommand;
pub use quiz_engine_event::QuizEngineEvent;
pub use quiz_question::{mock_movies, mock_questions, MockMovie, QuizQuestion, RATING_THRESHOLD};
pub use quiz_step::QuizStep;
pub use statistics_record::StatisticsRecord;
