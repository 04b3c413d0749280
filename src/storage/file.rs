//! File-based snapshot storage.
//!
//! The snapshot lives as one JSON document, `state.json`, under the
//! almanack home directory. Atomic writes are achieved via temp file +
//! rename pattern.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::config::almanack_home;
use crate::core::PracticeState;
use crate::error::{AlmanackError, Result};
use crate::storage::StateStore;

/// Name of the snapshot document inside the data directory.
pub const STATE_FILE: &str = "state.json";

/// File-based snapshot storage.
///
/// Stores the snapshot as a JSON file in a configurable directory.
/// Uses atomic writes via temp file + rename pattern.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    /// Directory holding the snapshot document.
    data_dir: PathBuf,
}

impl FileStateStore {
    /// Create a file store in the default directory.
    ///
    /// Uses `~/.almanack/` or `$ALMANACK_HOME/`.
    pub fn new() -> Result<Self> {
        let dir = almanack_home().ok_or_else(|| {
            AlmanackError::config("could not determine data directory (no home directory)")
        })?;
        Self::with_dir(dir)
    }

    /// Create a file store in a custom directory.
    pub fn with_dir(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).map_err(|e| AlmanackError::storage(&data_dir, e))?;
        }

        Ok(Self { data_dir })
    }

    /// Path of the snapshot document.
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(STATE_FILE)
    }

    /// Path of the temp file used during atomic writes.
    fn temp_path(&self) -> PathBuf {
        self.data_dir.join(format!(".{STATE_FILE}.tmp"))
    }

    /// Write the snapshot atomically using temp file + rename.
    fn atomic_write(&self, state: &PracticeState) -> Result<()> {
        let final_path = self.state_path();
        let temp_path = self.temp_path();

        let json = serde_json::to_string_pretty(state)?;

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| AlmanackError::storage(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| AlmanackError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| AlmanackError::storage(&temp_path, e))?;
        }

        // Rename temp file to final path (atomic on POSIX)
        fs::rename(&temp_path, &final_path).map_err(|e| AlmanackError::storage(&final_path, e))?;

        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<PracticeState>> {
        let path = self.state_path();

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| AlmanackError::storage(&path, e))?;
        let state: PracticeState = serde_json::from_str(&content)?;

        Ok(Some(state))
    }

    fn save(&self, state: &PracticeState) -> Result<()> {
        self.atomic_write(state)
    }

    fn exists(&self) -> Result<bool> {
        Ok(self.state_path().exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::tests::test_state_store_contract;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStateStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::with_dir(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_file_state_store_contract() {
        let (store, _dir) = create_test_store();
        test_state_store_contract(&store);
    }

    #[test]
    fn test_with_dir_creates_directory() {
        let dir = TempDir::new().unwrap();
        let data_path = dir.path().join("almanack");

        assert!(!data_path.exists());

        let _store = FileStateStore::with_dir(&data_path).unwrap();

        assert!(data_path.exists());
        assert!(data_path.is_dir());
    }

    #[test]
    fn test_load_nothing_saved() {
        let (store, _dir) = create_test_store();

        assert!(store.load().unwrap().is_none());
        assert!(!store.exists().unwrap());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (store, _dir) = create_test_store();

        let mut state = PracticeState::default();
        state.user_name = Some("Ben".to_string());
        state.virtue_queue = vec!["order".to_string(), "silence".to_string()];
        store.save(&state).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn test_save_replaces_existing() {
        let (store, _dir) = create_test_store();

        let mut state = PracticeState::default();
        store.save(&state).unwrap();

        state.streak.total_days_logged = 12;
        store.save(&state).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.streak.total_days_logged, 12);
    }

    #[test]
    fn test_atomic_write_creates_valid_json() {
        let (store, _dir) = create_test_store();

        store.save(&PracticeState::default()).unwrap();

        let content = fs::read_to_string(store.state_path()).unwrap();
        let parsed: PracticeState = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, PracticeState::default());
    }

    #[test]
    fn test_temp_file_cleaned_up() {
        let (store, _dir) = create_test_store();

        store.save(&PracticeState::default()).unwrap();

        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error_not_a_reset() {
        let (store, _dir) = create_test_store();

        fs::write(store.state_path(), "not valid json").unwrap();

        let result = store.load();
        assert!(result.is_err());
    }
}
