pub mod key_value_store;
pub mod question_factory;
pub mod quiz_engine;
pub mod quiz_session;
pub mod scheduler;
pub mod settings;
pub mod statistic_service;

pub use key_value_store::{InMemoryStore, JsonFileStore, KeyValueStore};
pub use question_factory::QuestionFactory;
pub use quiz_engine::QuizEngine;
pub use quiz_session::{QuizSession, RoundProgress};
pub use scheduler::{CancellationToken, ManualScheduler, Scheduler, Task};
pub use settings::Settings;
pub use statistic_service::StatisticService;
