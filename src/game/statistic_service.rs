use std::time::SystemTime;

use log::{debug, warn};
use serde_json::{json, Value};

use super::key_value_store::KeyValueStore;
use crate::error::{StatisticsError, StorageError};
use crate::model::{GameResult, StatisticsRecord};

const GAMES_COUNT_KEY: &str = "games_count";
const BEST_GAME_KEY: &str = "best_game";
const TOTAL_CORRECT_KEY: &str = "total_correct";
const TOTAL_QUESTIONS_KEY: &str = "total_questions";
// Written alongside the totals for anything reading the file directly; reads
// always derive accuracy from the totals.
const TOTAL_ACCURACY_KEY: &str = "total_accuracy";

/// Records completed rounds and answers questions about all rounds so far.
pub struct StatisticService {
    storage: Box<dyn KeyValueStore>,
}

impl StatisticService {
    pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn store(&mut self, correct: u32, total: u32) -> Result<(), StatisticsError> {
        self.store_at(correct, total, SystemTime::now())
    }

    /// Read-modify-write of every aggregate in a single storage call. On error
    /// the previously persisted record stays in place.
    pub fn store_at(
        &mut self,
        correct: u32,
        total: u32,
        date: SystemTime,
    ) -> Result<(), StatisticsError> {
        if total == 0 || correct > total {
            return Err(StatisticsError::InvalidResult { correct, total });
        }

        let result = GameResult::new(correct, total, date);
        let record = self.record().recorded(&result);
        debug!(
            target: "statistic_service",
            "Storing round {}/{}; games: {}, best: {}/{}",
            correct, total, record.games_count, record.best_game.correct, record.best_game.total
        );

        let best_game = serde_json::to_value(&record.best_game).map_err(StorageError::from)?;
        self.storage.set_all(vec![
            (GAMES_COUNT_KEY.to_string(), json!(record.games_count)),
            (BEST_GAME_KEY.to_string(), best_game),
            (TOTAL_CORRECT_KEY.to_string(), json!(record.total_correct)),
            (TOTAL_QUESTIONS_KEY.to_string(), json!(record.total_questions)),
            (TOTAL_ACCURACY_KEY.to_string(), json!(record.total_accuracy())),
        ])?;
        Ok(())
    }

    pub fn games_count(&self) -> u32 {
        self.read_u64(GAMES_COUNT_KEY)
            .map(|count| u32::try_from(count).unwrap_or(u32::MAX))
            .unwrap_or(0)
    }

    pub fn best_game(&self) -> GameResult {
        match self.storage.get(BEST_GAME_KEY) {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
                warn!(target: "statistic_service", "Ignoring unreadable best game: {}", err);
                GameResult::default()
            }),
            None => GameResult::default(),
        }
    }

    pub fn total_accuracy(&self) -> f64 {
        self.record().total_accuracy()
    }

    pub fn record(&self) -> StatisticsRecord {
        StatisticsRecord {
            games_count: self.games_count(),
            best_game: self.best_game(),
            total_correct: self.read_u64(TOTAL_CORRECT_KEY).unwrap_or(0),
            total_questions: self.read_u64(TOTAL_QUESTIONS_KEY).unwrap_or(0),
        }
    }

    fn read_u64(&self, key: &str) -> Option<u64> {
        let value = self.storage.get(key)?;
        match value {
            Value::Number(ref number) if number.is_u64() => number.as_u64(),
            _ => {
                warn!(
                    target: "statistic_service",
                    "Ignoring unexpected value for {}: {}",
                    key,
                    value
                );
                None
            }
        }
    }
}
