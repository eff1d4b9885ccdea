use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::catalog::GameId;
use crate::error::StorageError;

/// Key the score table is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "miniGamesScores";

/// Best score per game. Serialized as a JSON object keyed by the decimal id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreTable {
    best: BTreeMap<GameId, u32>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored high score, 0 when the game was never scored.
    pub fn get(&self, id: GameId) -> u32 {
        self.best.get(&id).copied().unwrap_or(0)
    }

    /// Record `score` if it beats the stored one. Returns whether it did.
    pub fn record(&mut self, id: GameId, score: u32) -> bool {
        if score > self.get(id) {
            self.best.insert(id, score);
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (GameId, u32)> + '_ {
        self.best.iter().map(|(&id, &score)| (id, score))
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|e| StorageError::Encode(e.to_string()))
    }

    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|e| StorageError::Parse(e.to_string()))
    }

    /// Load the table from `store`, falling back to an empty one on any
    /// read or parse failure.
    pub fn load_or_default(store: &dyn ScoreStore) -> Self {
        match store.load() {
            Ok(Some(raw)) => match Self::from_json(&raw) {
                Ok(table) => table,
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable score table");
                    Self::default()
                },
            },
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Score storage unavailable, starting empty");
                Self::default()
            },
        }
    }
}

/// Flat key-value persistence for the serialized score table.
pub trait ScoreStore {
    /// The stored blob, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<String>, StorageError>;

    fn save(&mut self, blob: &str) -> Result<(), StorageError>;
}

/// Store that keeps the blob in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
        }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.blob.clone())
    }

    fn save(&mut self, blob: &str) -> Result<(), StorageError> {
        self.blob = Some(blob.to_string());
        Ok(())
    }
}

/// Store backed by a JSON file, for native builds.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    fn save(&mut self, blob: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        std::fs::write(&self.path, blob).map_err(|e| StorageError::Io(e.to_string()))
    }
}
