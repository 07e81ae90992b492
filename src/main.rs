//! Scenario replay binary.
//!
//! Replays a TOML scenario against a list-backed engine and prints one JSON
//! object per step on stdout: the step, the host callbacks it produced, and the
//! activated items afterwards.
//!
//! ```text
//! rowselect scenario.toml --trace-level debug --state-file /tmp/state.json
//! ```
//!
//! Snapshots written by `save` steps go to the state file, so a later run can
//! `recreate` from them.

use clap::Parser;
use rowselect::observability::init_tracing;
use rowselect::scenario::Scenario;
use rowselect::storage::JsonStateStore;
use rowselect::{Config, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "rowselect", version, about = "Replay selection scenarios")]
struct Cli {
    /// Scenario file (TOML).
    scenario: PathBuf,

    /// Configuration file (TOML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Tracing filter, overrides the config file.
    #[arg(short, long, value_name = "LEVEL")]
    trace_level: Option<String>,

    /// Snapshot file, overrides the config file.
    #[arg(short, long, value_name = "FILE")]
    state_file: Option<String>,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(level) = &self.trace_level {
            config.trace_level = Some(level.clone());
        }
        if let Some(state_file) = &self.state_file {
            config.state_file = Some(state_file.clone());
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.config()?;
    init_tracing(&config);

    let mut scenario = Scenario::from_file(&cli.scenario)?;
    scenario.choice_mode = scenario.choice_mode.or(Some(config.default_choice_mode));

    let state_file = config.state_file_path();
    tracing::debug!(scenario = %cli.scenario.display(), state_file = %state_file.display(), "starting replay");
    let mut store = JsonStateStore::new(state_file)?;

    let reports = scenario.run(&mut store)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for report in &reports {
        writeln!(out, "{}", serde_json::to_string(report)?)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "replay failed");
            eprintln!("rowselect: {e}");
            ExitCode::FAILURE
        }
    }
}
