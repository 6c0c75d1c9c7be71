use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{trace, warn};
use serde_json::{Map, Value};

use crate::error::StorageError;

/// Flat key-value persistence used by the statistics service.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;

    /// Writes every entry or none of them.
    fn set_all(&mut self, entries: Vec<(String, Value)>) -> Result<(), StorageError>;

    fn set(&mut self, key: &str, value: Value) -> Result<(), StorageError> {
        self.set_all(vec![(key.to_string(), value)])
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    values: HashMap<String, Value>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_all(&mut self, entries: Vec<(String, Value)>) -> Result<(), StorageError> {
        self.values.extend(entries);
        Ok(())
    }
}

/// Keeps all values in one JSON object on disk. Every write replaces the file
/// through a temporary sibling so a crash never leaves a half-written object.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(values) => values,
                Err(err) => {
                    warn!(
                        target: "key_value_store",
                        "Ignoring unreadable store {}: {}",
                        path.display(),
                        err
                    );
                    Map::new()
                }
            },
            Err(_) => {
                trace!(target: "key_value_store", "No store at {}, starting empty", path.display());
                Map::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, values: &Map<String, Value>) -> Result<(), StorageError> {
        let io_error = |source: std::io::Error| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(io_error)?;
        }
        let contents = serde_json::to_string_pretty(values)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).map_err(io_error)?;
        fs::rename(&tmp_path, &self.path).map_err(io_error)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_all(&mut self, entries: Vec<(String, Value)>) -> Result<(), StorageError> {
        let mut values = self.values.clone();
        values.extend(entries);
        self.save(&values)?;
        self.values = values;
        Ok(())
    }
}
