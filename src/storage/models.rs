//! Storage record models for snapshot persistence.
//!
//! Records wrap an engine [`SavedState`] with storage metadata. They are kept
//! separate from the engine snapshot so the snapshot format stays a pure
//! description of selection state.

use crate::engine::SavedState;
use serde::{Deserialize, Serialize};

/// A stored snapshot for one view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    /// Host-chosen key identifying the view (for example a screen name).
    pub key: String,

    /// Unix timestamp of the last save.
    pub saved_at: i64,

    /// Number of times this key has been saved.
    #[serde(default)]
    pub save_count: u32,

    pub state: SavedState,
}

impl SnapshotRecord {
    /// Creates a record stamped with the current time.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowselect::engine::{ChoiceMode, SavedState, SNAPSHOT_VERSION};
    /// use rowselect::storage::SnapshotRecord;
    ///
    /// let state = SavedState {
    ///     version: SNAPSHOT_VERSION,
    ///     choice_mode: ChoiceMode::Single,
    ///     pending_choice_mode: None,
    ///     activated_positions: vec![],
    ///     activated_identities: vec![],
    ///     non_clickable_positions: vec![],
    ///     action_mode_active: false,
    /// };
    /// let record = SnapshotRecord::new("inbox", state);
    /// assert_eq!(record.key, "inbox");
    /// assert_eq!(record.save_count, 1);
    /// ```
    pub fn new(key: impl Into<String>, state: SavedState) -> Self {
        Self {
            key: key.into(),
            saved_at: chrono::Utc::now().timestamp(),
            save_count: 1,
            state,
        }
    }
}
