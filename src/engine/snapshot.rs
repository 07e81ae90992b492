//! Serializable engine snapshot for host teardown and recreation.
//!
//! Activated entries are stored as two parallel arrays so the record maps
//! cleanly onto flat key/value bundles as well as JSON:
//!
//! ```json
//! {
//!   "version": 1,
//!   "choice_mode": "multiple",
//!   "activated_positions": [1, 5],
//!   "activated_identities": [10, 70],
//!   "non_clickable_positions": [0],
//!   "action_mode_active": true
//! }
//! ```

use crate::domain::{Identity, Position, Result, RowSelectError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ChoiceMode;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to rebuild an engine's selection state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Configured (not effective) choice mode.
    pub choice_mode: ChoiceMode,

    /// Mode change requested while the overlay was open and not yet applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_choice_mode: Option<ChoiceMode>,

    #[serde(default)]
    pub activated_positions: Vec<Position>,

    /// Identity for each entry of `activated_positions`, index for index.
    #[serde(default)]
    pub activated_identities: Vec<Identity>,

    #[serde(default)]
    pub non_clickable_positions: Vec<Position>,

    #[serde(default)]
    pub action_mode_active: bool,
}

const fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl SavedState {
    /// Checks the snapshot is internally consistent.
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` if the parallel arrays differ in length, a position
    /// appears twice, or the version is newer than this build understands.
    pub fn validate(&self) -> Result<()> {
        if self.version > SNAPSHOT_VERSION {
            return Err(RowSelectError::InvalidSnapshot(format!(
                "unsupported version {} (newest known is {SNAPSHOT_VERSION})",
                self.version
            )));
        }
        if self.activated_positions.len() != self.activated_identities.len() {
            return Err(RowSelectError::InvalidSnapshot(format!(
                "{} activated positions but {} identities",
                self.activated_positions.len(),
                self.activated_identities.len()
            )));
        }
        let mut seen = HashSet::with_capacity(self.activated_positions.len());
        if let Some(dup) = self.activated_positions.iter().find(|p| !seen.insert(**p)) {
            return Err(RowSelectError::InvalidSnapshot(format!(
                "activated position {dup} listed twice"
            )));
        }
        Ok(())
    }

    /// `(position, identity)` pairs.
    pub fn activated_entries(&self) -> impl Iterator<Item = (Position, Identity)> + '_ {
        self.activated_positions
            .iter()
            .copied()
            .zip(self.activated_identities.iter().copied())
    }

    /// Encodes the snapshot as compact JSON.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes and validates a JSON snapshot.
    ///
    /// # Errors
    ///
    /// `Serialization` for malformed JSON, `InvalidSnapshot` for inconsistent content.
    pub fn from_json(json: &str) -> Result<Self> {
        let state: Self = serde_json::from_str(json)?;
        state.validate()?;
        Ok(state)
    }
}
