//! Snapshot store abstraction.
//!
//! This module defines the [`StateStore`] trait that abstracts over where engine
//! snapshots live between host teardown and recreation. The engine never calls
//! it; hosts save after [`save_state`](crate::engine::SelectionEngine::save_state)
//! and load before [`restore_state`](crate::engine::SelectionEngine::restore_state).

use crate::domain::error::Result;
use crate::engine::SavedState;
use crate::storage::models::SnapshotRecord;

/// Abstraction over snapshot persistence backends.
///
/// # Implementations
///
/// - [`JsonStateStore`](super::JsonStateStore): JSON file with atomic writes
/// - [`MemoryStateStore`](super::MemoryStateStore): in-process map
///
/// # Examples
///
/// ```no_run
/// use rowselect::storage::{JsonStateStore, StateStore};
/// use std::path::PathBuf;
///
/// let store = JsonStateStore::new(PathBuf::from("/tmp/rowselect-state.json"))?;
/// let saved = store.load("inbox")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait StateStore {
    /// Stores `state` under `key`, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&mut self, key: &str, state: &SavedState) -> Result<()>;

    /// Loads the snapshot stored under `key`, `Ok(None)` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the stored snapshot is invalid.
    fn load(&self, key: &str) -> Result<Option<SavedState>>;

    /// Full record (with metadata) stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn record(&self, key: &str) -> Result<Option<SnapshotRecord>>;

    /// Deletes the snapshot under `key`. Returns `true` if one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove(&mut self, key: &str) -> Result<bool>;

    /// All stored keys, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn keys(&self) -> Result<Vec<String>>;
}
