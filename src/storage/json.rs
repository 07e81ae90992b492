//! JSON file-based snapshot store.
//!
//! This module provides a human-readable store using JSON serialization. It uses
//! atomic file writes (write-to-temp + rename) so a crash mid-save never leaves a
//! half-written file behind.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "snapshots": {
//!     "inbox": {
//!       "key": "inbox",
//!       "saved_at": 1760572800,
//!       "save_count": 3,
//!       "state": { "choice_mode": "multiple", "activated_positions": [2], ... }
//!     }
//!   }
//! }
//! ```

use crate::domain::error::{Result, RowSelectError};
use crate::engine::SavedState;
use crate::storage::backend::StateStore;
use crate::storage::models::SnapshotRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Current container format version.
const STORAGE_VERSION: u32 = 1;

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    version: u32,

    #[serde(default)]
    snapshots: BTreeMap<String, SnapshotRecord>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: STORAGE_VERSION,
            snapshots: BTreeMap::new(),
        }
    }
}

/// JSON file snapshot store.
///
/// The whole file is loaded on creation and rewritten on every change.
pub struct JsonStateStore {
    file_path: PathBuf,
    data: StorageData,
    /// Set when `data` differs from the file on disk.
    dirty: bool,
}

impl JsonStateStore {
    /// Creates or opens a JSON snapshot store.
    ///
    /// Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but contains invalid JSON
    /// - The file was written by a newer container version
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON state store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StorageData::default()
        };

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| RowSelectError::Storage(format!("failed to parse JSON: {e}")))?;

        if data.version > STORAGE_VERSION {
            return Err(RowSelectError::Storage(format!(
                "unsupported storage version {}",
                data.version
            )));
        }

        tracing::debug!(
            version = data.version,
            snapshots = data.snapshots.len(),
            "loaded state store"
        );
        Ok(data)
    }

    /// Writes the in-memory data to disk if it changed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the temporary write, or the rename fails.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| RowSelectError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "state store saved");
        Ok(())
    }
}

impl StateStore for JsonStateStore {
    fn save(&mut self, key: &str, state: &SavedState) -> Result<()> {
        let _span = tracing::debug_span!("json_save_state", key = %key).entered();
        state.validate()?;

        let save_count = self.data.snapshots.get(key).map_or(0, |r| r.save_count);
        let mut record = SnapshotRecord::new(key, state.clone());
        record.save_count = save_count.saturating_add(1);
        self.data.snapshots.insert(key.to_string(), record);

        self.dirty = true;
        self.save_to_file()
    }

    fn load(&self, key: &str) -> Result<Option<SavedState>> {
        let _span = tracing::debug_span!("json_load_state", key = %key).entered();

        let Some(record) = self.data.snapshots.get(key) else {
            tracing::debug!("no snapshot stored");
            return Ok(None);
        };
        record.state.validate()?;
        Ok(Some(record.state.clone()))
    }

    fn record(&self, key: &str) -> Result<Option<SnapshotRecord>> {
        Ok(self.data.snapshots.get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        let _span = tracing::debug_span!("json_remove_state", key = %key).entered();

        if self.data.snapshots.remove(key).is_none() {
            return Ok(false);
        }
        self.dirty = true;
        self.save_to_file()?;
        Ok(true)
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.data.snapshots.keys().cloned().collect())
    }
}

impl Drop for JsonStateStore {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ChoiceMode, SNAPSHOT_VERSION};
    use crate::Identity;

    fn state(active: bool) -> SavedState {
        SavedState {
            version: SNAPSHOT_VERSION,
            choice_mode: ChoiceMode::Single,
            pending_choice_mode: Some(ChoiceMode::None),
            activated_positions: vec![4],
            activated_identities: vec![Identity::new(99)],
            non_clickable_positions: vec![0, 2],
            action_mode_active: active,
        }
    }

    #[test]
    fn snapshots_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        {
            let mut store = JsonStateStore::new(path.clone()).unwrap();
            store.save("inbox", &state(true)).unwrap();
            store.save("archive", &state(false)).unwrap();
        }

        let store = JsonStateStore::new(path).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["archive", "inbox"]);
        assert_eq!(store.load("inbox").unwrap(), Some(state(true)));
        assert_eq!(store.load("missing").unwrap(), None);
    }

    #[test]
    fn repeated_saves_count_up() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStateStore::new(dir.path().join("state.json")).unwrap();
        store.save("inbox", &state(false)).unwrap();
        store.save("inbox", &state(true)).unwrap();

        let record = store.record("inbox").unwrap().unwrap();
        assert_eq!(record.save_count, 2);
        assert!(record.state.action_mode_active);
    }

    #[test]
    fn remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut store = JsonStateStore::new(path.clone()).unwrap();
        store.save("inbox", &state(false)).unwrap();

        assert!(store.remove("inbox").unwrap());
        drop(store);

        let reopened = JsonStateStore::new(path).unwrap();
        assert!(reopened.keys().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = JsonStateStore::new(path).err().unwrap();
        assert!(matches!(err, RowSelectError::Storage(_)));
    }

    #[test]
    fn invalid_snapshot_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStateStore::new(dir.path().join("state.json")).unwrap();
        let mut bad = state(false);
        bad.activated_identities.clear();

        assert!(store.save("inbox", &bad).is_err());
        assert!(store.keys().unwrap().is_empty());
    }
}
