//! Structured logging for the engine and its hosts.
//!
//! The engine emits `tracing` spans and events at `debug`/`trace` level for
//! every operation and state transition. This module wires them to a sink:
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → stderr | rotating log file
//! ```
//!
//! # Configuration
//!
//! Filter directives come from:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: subscriber setup
//! - [`file_writer`]: size-rotated log file

pub mod file_writer;
pub mod init;

pub use file_writer::FileWriter;
pub use init::init_tracing;
