use arcade_core::error::StorageError;
use arcade_core::scores::ScoreStore;

use crate::diag::console_warn;

/// Score table kept under one `localStorage` key.
#[derive(Debug, Clone)]
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// The page's localStorage. Private browsing modes and native builds have
/// none.
#[cfg(target_family = "wasm")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    let window =
        web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
    match window.local_storage() {
        Ok(Some(storage)) => Ok(storage),
        Ok(None) => Err(StorageError::Unavailable("localStorage disabled".to_string())),
        Err(e) => Err(StorageError::Unavailable(format!("{e:?}"))),
    }
}

#[cfg(target_family = "wasm")]
fn read_item(key: &str) -> Result<Option<String>, StorageError> {
    local_storage()?
        .get_item(key)
        .map_err(|e| StorageError::Io(format!("read {key}: {e:?}")))
}

#[cfg(target_family = "wasm")]
fn write_item(key: &str, blob: &str) -> Result<(), StorageError> {
    local_storage()?
        .set_item(key, blob)
        .map_err(|e| StorageError::Io(format!("write {key}: {e:?}")))
}

#[cfg(not(target_family = "wasm"))]
fn read_item(_key: &str) -> Result<Option<String>, StorageError> {
    Err(StorageError::Unavailable("localStorage needs a browser".to_string()))
}

#[cfg(not(target_family = "wasm"))]
fn write_item(_key: &str, _blob: &str) -> Result<(), StorageError> {
    Err(StorageError::Unavailable("localStorage needs a browser".to_string()))
}

/// The manager logs through `tracing`, which has no subscriber in the
/// browser, so storage failures go to the console here.
fn warn_on_err<T>(action: &str, key: &str, result: Result<T, StorageError>) -> Result<T, StorageError> {
    if let Err(e) = &result {
        console_warn!("Error {action} scores ({key}): {e}");
    }
    result
}

impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        warn_on_err("loading", &self.key, read_item(&self.key))
    }

    fn save(&mut self, blob: &str) -> Result<(), StorageError> {
        warn_on_err("saving", &self.key, write_item(&self.key, blob))
    }
}

#[cfg(test)]
mod tests {
    use arcade_core::scores::ScoreTable;

    use super::*;

    #[test]
    fn native_build_reports_unavailable() {
        let mut store = LocalStorageStore::new("miniGamesScores");
        assert!(matches!(store.load(), Err(StorageError::Unavailable(_))));
        assert!(store.save("{}").is_err());
        assert!(ScoreTable::load_or_default(&store).is_empty());
    }

    #[test]
    fn failed_writes_are_passed_through_after_logging() {
        let err = StorageError::Io("write miniGamesScores: QuotaExceededError".to_string());
        let result: Result<(), StorageError> = warn_on_err("saving", "miniGamesScores", Err(err.clone()));
        assert_eq!(result, Err(err));
        assert_eq!(warn_on_err("loading", "k", Ok(Some("{}".to_string()))), Ok(Some("{}".to_string())));
    }
}
