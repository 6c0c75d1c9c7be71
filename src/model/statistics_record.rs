use super::GameResult;

/// Aggregate of every recorded round. Accuracy is derived, never stored
/// independently of the totals it comes from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsRecord {
    pub games_count: u32,
    pub best_game: GameResult,
    pub total_correct: u64,
    pub total_questions: u64,
}

impl StatisticsRecord {
    pub fn total_accuracy(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        // totals edited by hand can claim more correct answers than questions
        let correct = self.total_correct.min(self.total_questions);
        correct as f64 / self.total_questions as f64 * 100.0
    }

    pub fn recorded(&self, result: &GameResult) -> StatisticsRecord {
        let best_game = if self.games_count == 0 || result.is_better_than(&self.best_game) {
            result.clone()
        } else {
            self.best_game.clone()
        };
        StatisticsRecord {
            games_count: self.games_count.saturating_add(1),
            best_game,
            total_correct: self.total_correct.saturating_add(result.correct as u64),
            total_questions: self.total_questions.saturating_add(result.total as u64),
        }
    }
}
