//! Choice mode and action-mode state types.
//!
//! These two enums are the whole state machine vocabulary of the engine:
//!
//! - [`ChoiceMode`]: host-configured tap policy (`None`, `Single`, `Multiple`)
//! - [`ActionModeState`]: whether the modal multi-select overlay is open
//!
//! While the overlay is open the *effective* choice mode is `Multiple`
//! regardless of the configured one; see
//! [`SelectionEngine::effective_choice_mode`](super::SelectionEngine::effective_choice_mode).
//!
//! # Example
//!
//! ```rust
//! use rowselect::engine::{ActionModeState, ChoiceMode};
//!
//! let mode: ChoiceMode = "single".parse().unwrap();
//! assert_eq!(mode, ChoiceMode::Single);
//! assert!(!ActionModeState::Inactive.is_active());
//! ```

use crate::binding::OverlayHandle;
use crate::domain::RowSelectError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tap policy configured by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceMode {
    /// Taps never activate anything; they are reported as plain clicks.
    #[default]
    None,

    /// At most one position is activated; tapping another moves the activation.
    Single,

    /// Each tap toggles the tapped position independently.
    Multiple,
}

impl ChoiceMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Single => "single",
            Self::Multiple => "multiple",
        }
    }
}

impl fmt::Display for ChoiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoiceMode {
    type Err = RowSelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "single" => Ok(Self::Single),
            "multiple" | "multi" => Ok(Self::Multiple),
            other => Err(RowSelectError::Config(format!(
                "unknown choice mode '{other}' (expected none, single or multiple)"
            ))),
        }
    }
}

/// Lifecycle state of the modal multi-select overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionModeState {
    /// No overlay; taps follow the configured choice mode.
    #[default]
    Inactive,

    /// Overlay open. The handle came from the overlay host and is handed back
    /// on every delta and on exit.
    Active(OverlayHandle),
}

impl ActionModeState {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    #[must_use]
    pub const fn handle(&self) -> Option<OverlayHandle> {
        match *self {
            Self::Inactive => None,
            Self::Active(handle) => Some(handle),
        }
    }
}
