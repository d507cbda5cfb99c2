//! Anonymous session identity.
//!
//! The storefront has no accounts. Cart rows and customization requests are
//! scoped to a [`SessionId`] that is generated once per client and persisted in
//! a small key-value store under [`SESSION_KEY`].
//!
//! The storage backend is abstracted behind [`KeyValueStore`] so the identity
//! can live in memory (tests), in a JSON file (the CLI), or anywhere else.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::{debug, warn};

use lynora_core::SessionId;

/// Well-known storage key holding the session id.
pub const SESSION_KEY: &str = "sessionId";

/// Errors from a [`KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backing file is not a JSON string map.
    #[error("storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The backend cannot be used at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Minimal client-side key-value capability.
pub trait KeyValueStore {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Returns `true` if `key` holds a value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn has(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Return the persisted session id, creating and persisting one if needed.
///
/// A stored value that is empty counts as missing. After writing a new id the
/// value is read back, so every caller observes the same identifier. If the
/// backend fails, a fresh ephemeral id is returned instead: the shopper gets a
/// working (if short-lived) session rather than an error.
pub fn get_or_create_session_id<S: KeyValueStore + ?Sized>(storage: &S) -> SessionId {
    match storage.get(SESSION_KEY) {
        Ok(Some(value)) => {
            if let Some(id) = SessionId::from_stored(value) {
                return id;
            }
        }
        Ok(None) => {}
        Err(e) => {
            warn!(error = %e, "Session storage unreadable, using ephemeral session id");
            return SessionId::generate();
        }
    }

    let generated = SessionId::generate();
    if let Err(e) = storage.set(SESSION_KEY, generated.as_str()) {
        warn!(error = %e, "Failed to persist session id, using ephemeral session id");
        return generated;
    }
    debug!(session_id = %generated, "Created new session id");

    match storage.get(SESSION_KEY) {
        Ok(Some(value)) => SessionId::from_stored(value).unwrap_or(generated),
        _ => generated,
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// =============================================================================
// FileStorage
// =============================================================================

/// Storage backed by a JSON object on disk (`{"sessionId": "..."}`).
///
/// Writes go to a sibling temp file that is renamed into place, so a crash
/// never leaves a half-written file. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Use `path` as the backing file. Nothing is touched until first access.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(HashMap::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_all(&entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Storage that refuses every operation.
    struct BrokenStorage;

    impl KeyValueStore for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }
    }

    /// Storage that reads fine but cannot be written.
    struct ReadOnlyStorage;

    impl KeyValueStore for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".to_string()))
        }
    }

    #[test]
    fn test_creates_once_and_reuses() {
        let storage = MemoryStorage::new();
        assert!(!storage.has(SESSION_KEY).unwrap());

        let first = get_or_create_session_id(&storage);
        let second = get_or_create_session_id(&storage);

        assert_eq!(first, second);
        assert!(storage.has(SESSION_KEY).unwrap());
        assert!(first.as_str().starts_with("session_"));
    }

    #[test]
    fn test_returns_existing_value_unchanged() {
        let storage = MemoryStorage::new();
        storage.set(SESSION_KEY, "session_1700000000000_abc123xyz").unwrap();
        let id = get_or_create_session_id(&storage);
        assert_eq!(id.as_str(), "session_1700000000000_abc123xyz");
    }

    #[test]
    fn test_empty_value_is_replaced() {
        let storage = MemoryStorage::new();
        storage.set(SESSION_KEY, "").unwrap();
        let id = get_or_create_session_id(&storage);
        assert!(!id.as_str().is_empty());
        assert_eq!(storage.get(SESSION_KEY).unwrap().unwrap(), id.as_str());
    }

    #[test]
    fn test_unavailable_storage_degrades_to_ephemeral_ids() {
        let first = get_or_create_session_id(&BrokenStorage);
        let second = get_or_create_session_id(&BrokenStorage);
        assert_ne!(first, second);
    }

    #[test]
    fn test_unwritable_storage_degrades_to_ephemeral_ids() {
        let first = get_or_create_session_id(&ReadOnlyStorage);
        let second = get_or_create_session_id(&ReadOnlyStorage);
        assert_ne!(first, second);
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let first = get_or_create_session_id(&FileStorage::new(&path));
        let second = get_or_create_session_id(&FileStorage::new(&path));

        assert_eq!(first, second);
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains(SESSION_KEY));
    }

    #[test]
    fn test_file_storage_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("absent.json"));
        assert_eq!(storage.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_storage_corrupt_file_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get(SESSION_KEY),
            Err(StorageError::Corrupt(_))
        ));
        // Identity still resolves, just without persistence
        let id = get_or_create_session_id(&storage);
        assert!(id.as_str().starts_with("session_"));
    }
}
