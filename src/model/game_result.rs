use std::cmp::Ordering;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use serde_with::serde_as;
use serde_with::TimestampSeconds;

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameResult {
    pub correct: u32,
    pub total: u32,
    #[serde_as(as = "TimestampSeconds")]
    pub date: SystemTime,
}

impl Default for GameResult {
    fn default() -> Self {
        Self {
            correct: 0,
            total: 0,
            date: UNIX_EPOCH,
        }
    }
}

impl GameResult {
    pub fn new(correct: u32, total: u32, date: SystemTime) -> Self {
        Self {
            correct,
            total,
            date,
        }
    }

    /// A tie counts as better so the most recent of equal rounds is kept.
    pub fn is_better_than(&self, other: &GameResult) -> bool {
        match self.correct.cmp(&other.correct) {
            Ordering::Greater => true,
            Ordering::Equal => self.date >= other.date,
            Ordering::Less => false,
        }
    }

    pub fn formatted_date(&self) -> String {
        DateTime::<Local>::from(self.date)
            .format("%d.%m.%y %H:%M")
            .to_string()
    }
}
