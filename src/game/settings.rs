use crate::model::QuestionOrder;
use log::{trace, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DATA_DIR_ENV: &str = "MOVIEQUIZ_DATA_DIR";
const SEED_ENV: &str = "QUIZ_SEED";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default = "default_questions_amount")]
    pub questions_amount: usize,

    #[serde(default = "default_answer_delay_ms")]
    pub answer_delay_ms: u64,

    #[serde(default)]
    pub question_order: QuestionOrder,

    #[serde(default)]
    pub posters_dir: Option<PathBuf>,
}

// Helper functions for default values
fn default_version() -> u32 {
    2
}
fn default_questions_amount() -> usize {
    10
}
fn default_answer_delay_ms() -> u64 {
    1000
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            questions_amount: default_questions_amount(),
            answer_delay_ms: default_answer_delay_ms(),
            question_order: QuestionOrder::default(),
            posters_dir: None,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::load_from(&Self::settings_path())
    }

    /// Falls back to defaults (and writes them back) when the file is missing
    /// or unreadable.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(contents) = fs::read_to_string(path) {
            match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.migrate();
                    return settings;
                }
                Err(err) => {
                    warn!(target: "settings", "Ignoring unreadable settings {}: {}", path.display(), err)
                }
            }
        }
        trace!(target: "settings", "Using default settings");
        let default = Settings::default();
        if let Err(err) = default.save_to(path) {
            warn!(target: "settings", "Could not write default settings: {}", err);
        }
        default
    }

    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        // Ensure the directory exists
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
    }

    pub fn data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("moviequiz")
    }

    fn settings_path() -> PathBuf {
        Self::data_dir().join("settings.json")
    }

    pub fn statistics_path() -> PathBuf {
        Self::data_dir().join("statistics.json")
    }

    pub fn posters_dir(&self) -> PathBuf {
        self.posters_dir
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("posters"))
    }

    pub fn poster_path(&self, image: &str) -> PathBuf {
        self.posters_dir().join(format!("{}.jpg", image))
    }

    pub fn questions_amount(&self) -> usize {
        self.questions_amount.max(1)
    }

    pub fn answer_delay(&self) -> Duration {
        Duration::from_millis(self.answer_delay_ms)
    }

    fn migrate(&mut self) {
        match self.version {
            // answer_delay_ms was introduced in version 2
            0 | 1 => {
                self.answer_delay_ms = default_answer_delay_ms();
                self.version = default_version();
            }
            _ => (),
        }
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var(SEED_ENV).ok()?.parse::<u64>().ok()
    }
}
