//! Rowselect: selection and action-mode state for scrolling list views.
//!
//! Rowselect tracks which items of a host-owned, position-indexed collection
//! are activated, and keeps that state coherent while the collection changes
//! underneath it:
//! - Selection store keyed by position, with item identities captured at
//!   activation time
//! - Remapping of activated and non-clickable positions on insert, remove,
//!   move and reset
//! - Choice modes (`none`, `single`, `multiple`) with tap handling
//! - Action mode: long-press entry into a contextual overlay, automatic exit
//!   when the selection empties, save/restore across host recreation

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Scenario CLI (main.rs, scenario)                   │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Engine Layer (engine/)                             │  ← State machine
//! │  - Event handling                                   │
//! │  - Choice modes                                     │
//! │  - Action mode + snapshots                          │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Selection     │   │ Storage Layer │   │ Binding Layer │
//! │ (selection/)  │   │ (storage/)    │   │ (binding/)    │
//! │ - Store       │   │ - JSON I/O    │   │ - Collection  │
//! │ - Remap       │   │ - In-memory   │   │ - Host traits │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Error types (domain/error)                       │
//! │  - Identity, Mutation (domain/)                     │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber, rotating log file            │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`domain`]: Positions, identities, mutations, errors
//! - [`selection`]: Activated/non-clickable sets and the remap function
//! - [`engine`]: Choice mode and action mode state machine
//! - [`binding`]: Host-facing traits plus list and cursor collections and recording hosts
//! - [`storage`]: Snapshot persistence
//! - [`scenario`]: Scripted replay used by the CLI
//! - [`infrastructure`]: Platform paths
//! - [`observability`]: Tracing setup
//!
//! # Examples
//!
//! ```rust
//! use rowselect::binding::{CallbackLog, ListCollection, RecordingHost, RecordingOverlay};
//! use rowselect::{handle_event, ChoiceMode, Event, SelectionEngine};
//!
//! let log = CallbackLog::new();
//! let mut list = ListCollection::with_len(5);
//! let mut engine =
//!     SelectionEngine::with_choice_mode(RecordingHost::new(log.clone()), ChoiceMode::Multiple);
//! engine.set_overlay_host(Some(Box::new(RecordingOverlay::new(log.clone()))))?;
//!
//! handle_event(&mut engine, &list, &Event::LongPress { position: 3 })?;
//! assert!(engine.is_action_mode_active());
//!
//! // two items inserted in front of the selection
//! let mutation = list.insert(0, 2)?;
//! handle_event(&mut engine, &list, &Event::Mutation(mutation))?;
//! assert_eq!(engine.activated_positions(), vec![5]);
//! # Ok::<(), rowselect::RowSelectError>(())
//! ```

pub mod binding;
pub mod domain;
pub mod engine;
pub mod infrastructure;
pub mod observability;
pub mod scenario;
pub mod selection;
pub mod storage;

pub use binding::{BoundCollection, Host, OverlayHandle, OverlayHost};
pub use domain::{Identity, Mutation, Position, Result, RowSelectError};
pub use engine::{handle_event, ChoiceMode, Event, Outcome, SavedState, SelectionEngine};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Runtime configuration.
///
/// Read from a TOML file with [`Config::from_file`] or from a flat string map
/// with [`Config::from_map`].
///
/// # Example
///
/// ```toml
/// trace_level = "debug"
/// log_file = "~/.local/state/rowselect/rowselect.log"
/// state_file = "~/.local/state/rowselect/state.json"
/// default_choice_mode = "multiple"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Filter directive for the tracing subscriber.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `"info"`
    pub trace_level: Option<String>,

    /// Log file path. Logs go to stderr when unset.
    pub log_file: Option<String>,

    /// Snapshot file path. Default: [`infrastructure::default_state_file`]
    pub state_file: Option<String>,

    /// Choice mode for engines built by [`initialize`].
    pub default_choice_mode: ChoiceMode,
}

impl Config {
    /// Parses configuration from a flat key/value map.
    ///
    /// # Parsing Rules
    ///
    /// - `trace_level`, `log_file`, `state_file`: taken verbatim, empty values ignored
    /// - `default_choice_mode`: parsed as [`ChoiceMode`], falls back to `none` on error
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use rowselect::{ChoiceMode, Config};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("default_choice_mode".to_string(), "single".to_string());
    /// map.insert("trace_level".to_string(), "debug".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.default_choice_mode, ChoiceMode::Single);
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| {
            config
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let default_choice_mode = config
            .get("default_choice_mode")
            .and_then(|s| {
                s.parse::<ChoiceMode>()
                    .map_err(|e| tracing::debug!(value = %s, error = %e, "ignoring default_choice_mode"))
                    .ok()
            })
            .unwrap_or_default();

        Self {
            trace_level: text("trace_level"),
            log_file: text("log_file"),
            state_file: text("state_file"),
            default_choice_mode,
        }
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Config` if it is not valid TOML or
    /// has unknown keys.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| RowSelectError::Config(format!("{}: {e}", path.display())))
    }

    /// Snapshot file location with `~` expanded.
    #[must_use]
    pub fn state_file_path(&self) -> PathBuf {
        self.state_file.as_deref().map_or_else(
            infrastructure::default_state_file,
            infrastructure::expand_tilde,
        )
    }
}

/// Builds an engine for `host` using the configured choice mode.
///
/// Tracing is not initialized here; call
/// [`init_tracing`](observability::init_tracing) once per process first.
///
/// # Example
///
/// ```rust
/// use rowselect::binding::RecordingHost;
/// use rowselect::{initialize, ChoiceMode, Config};
///
/// let config = Config {
///     default_choice_mode: ChoiceMode::Single,
///     ..Default::default()
/// };
///
/// let engine = initialize(&config, RecordingHost::default());
/// assert_eq!(engine.choice_mode(), ChoiceMode::Single);
/// ```
pub fn initialize<H: Host>(config: &Config, host: H) -> SelectionEngine<H> {
    tracing::debug!(choice_mode = %config.default_choice_mode, "initializing selection engine");
    SelectionEngine::with_choice_mode(host, config.default_choice_mode)
}
