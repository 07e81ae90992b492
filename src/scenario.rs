//! Scripted replay of taps, long-presses and collection edits.
//!
//! A [`Scenario`] drives a [`ListCollection`] and a [`SelectionEngine`] wired to
//! recording hosts, and reports after each step what the engine told the host
//! and what is activated. This is the adapter behind the `rowselect` binary.
//!
//! # TOML Format
//!
//! ```toml
//! length = 10
//! choice_mode = "multiple"
//! overlay = true
//!
//! [[steps]]
//! op = "long_press"
//! position = 4
//!
//! [[steps]]
//! op = "remove"
//! start = 3
//! count = 2
//! ```
//!
//! Failing steps (for example an out-of-range tap) are reported with their error
//! and the replay continues, since the engine leaves its state untouched.

use crate::binding::{
    BoundCollection, CallbackLog, HostCallback, ListCollection, RecordingHost, RecordingOverlay,
};
use crate::domain::{Identity, Position, Result, RowSelectError};
use crate::engine::{handle_event, ChoiceMode, Event, Outcome, SelectionEngine};
use crate::storage::StateStore;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A scripted session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Initial collection length.
    pub length: usize,

    /// Choice mode of the engine; `None` leaves it to the caller's config.
    #[serde(default)]
    pub choice_mode: Option<ChoiceMode>,

    /// Whether an overlay capability is registered.
    #[serde(default = "default_overlay")]
    pub overlay: bool,

    #[serde(default)]
    pub steps: Vec<Step>,
}

const fn default_overlay() -> bool {
    true
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Tap { position: Position },
    LongPress { position: Position },
    Insert { start: Position, count: usize },
    Remove { start: Position, count: usize },
    Move { from: Position, to: Position, count: usize },
    /// Reloads the collection with `length` fresh items.
    Reset { length: usize },
    SetChoiceMode { mode: ChoiceMode },
    SetClickable { position: Position, clickable: bool },
    SetActivated { position: Position, activated: bool },
    Clear,
    DismissOverlay,
    /// Saves the engine snapshot under `key`.
    Save { key: String },
    /// Tears the engine down and rebuilds it from the snapshot under `key`.
    ///
    /// `overlay` overrides whether the rebuilt host registers an overlay
    /// capability.
    Recreate {
        key: String,
        #[serde(default)]
        overlay: Option<bool>,
    },
}

/// What happened during one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub index: usize,
    pub step: Step,
    pub callbacks: Vec<HostCallback>,
    /// `(position, identity)` pairs after the step, sorted by position.
    pub activated: Vec<(Position, Identity)>,
    pub action_mode_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Scenario {
    /// Parses a scenario from TOML text.
    ///
    /// # Errors
    ///
    /// `Config` if the text is not a valid scenario.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| RowSelectError::Config(format!("invalid scenario: {e}")))
    }

    /// Reads and parses a scenario file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Config` if it is not a valid scenario.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Replays every step, persisting snapshots through `store`.
    ///
    /// # Errors
    ///
    /// Only storage failures abort the replay; engine errors are recorded in
    /// the step's report.
    pub fn run(&self, store: &mut dyn StateStore) -> Result<Vec<StepReport>> {
        let _span = tracing::info_span!("scenario", length = self.length, steps = self.steps.len())
            .entered();

        let mut runner = Runner::new(self);
        let mut reports = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            tracing::debug!(index, step = ?step, "replaying step");
            let error = match runner.apply(step, store) {
                Ok(()) => None,
                Err(e) if e.is_precondition() => {
                    tracing::warn!(index, error = %e, "step rejected");
                    Some(e.to_string())
                }
                Err(e) => return Err(e),
            };
            reports.push(StepReport {
                index,
                step: step.clone(),
                callbacks: runner.log.take(),
                activated: runner.engine.store().activated_entries(),
                action_mode_active: runner.engine.is_action_mode_active(),
                error,
            });
        }

        tracing::info!(
            activated = runner.engine.activated_count(),
            collection_len = runner.list.len(),
            "scenario finished"
        );
        Ok(reports)
    }
}

struct Runner {
    list: ListCollection,
    log: CallbackLog,
    engine: SelectionEngine<RecordingHost>,
}

impl Runner {
    fn new(scenario: &Scenario) -> Self {
        let log = CallbackLog::new();
        let engine = build_engine(
            &log,
            scenario.choice_mode.unwrap_or_default(),
            scenario.overlay,
        );
        Self {
            list: ListCollection::with_len(scenario.length),
            log,
            engine,
        }
    }

    fn apply(&mut self, step: &Step, store: &mut dyn StateStore) -> Result<()> {
        let event = match step {
            Step::Tap { position } => Event::Tap {
                position: *position,
            },
            Step::LongPress { position } => Event::LongPress {
                position: *position,
            },
            Step::Insert { start, count } => Event::Mutation(self.list.insert(*start, *count)?),
            Step::Remove { start, count } => Event::Mutation(self.list.remove(*start, *count)?),
            Step::Move { from, to, count } => {
                Event::Mutation(self.list.move_range(*from, *to, *count)?)
            }
            Step::Reset { length } => Event::Mutation(self.list.reset(*length)),
            Step::SetChoiceMode { mode } => Event::SetChoiceMode { mode: *mode },
            Step::SetClickable {
                position,
                clickable,
            } => Event::SetClickable {
                position: *position,
                clickable: *clickable,
            },
            Step::SetActivated {
                position,
                activated,
            } => Event::SetActivated {
                position: *position,
                activated: *activated,
            },
            Step::Clear => Event::ClearActivations,
            Step::DismissOverlay => Event::OverlayDismissed,
            Step::Save { key } => {
                store.save(key, &self.engine.save_state())?;
                return Ok(());
            }
            Step::Recreate { key, overlay } => return self.recreate(key, *overlay, store),
        };

        let outcome = handle_event(&mut self.engine, &self.list, &event)?;
        if let Outcome::Remapped(report) = outcome {
            if report.dropped_activations > 0 {
                tracing::debug!(
                    dropped = report.dropped_activations,
                    "mutation dropped activated items"
                );
            }
        }
        Ok(())
    }

    fn recreate(&mut self, key: &str, overlay: Option<bool>, store: &dyn StateStore) -> Result<()> {
        let state = store
            .load(key)?
            .ok_or_else(|| RowSelectError::Storage(format!("no snapshot saved under '{key}'")))?;
        let with_overlay = overlay.unwrap_or_else(|| self.engine.has_overlay_host());

        tracing::debug!(key, with_overlay, "recreating engine");
        self.engine = build_engine(&self.log, ChoiceMode::default(), with_overlay);
        self.engine.restore_state(&state)
    }
}

fn build_engine(
    log: &CallbackLog,
    choice_mode: ChoiceMode,
    overlay: bool,
) -> SelectionEngine<RecordingHost> {
    let mut engine = SelectionEngine::with_choice_mode(RecordingHost::new(log.clone()), choice_mode);
    if overlay {
        // a fresh engine is never in action mode, so registration cannot fail
        let _ = engine.set_overlay_host(Some(Box::new(RecordingOverlay::new(log.clone()))));
    }
    engine
}
