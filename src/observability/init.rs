//! Tracing initialization and subscriber setup.

use super::file_writer::FileWriter;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_TRACE_LEVEL: &str = "info";

/// Installs the global tracing subscriber.
///
/// Sets up a `tracing-subscriber` registry that:
/// 1. Filters events by `RUST_LOG`, else `config.trace_level`, else `"info"`
/// 2. Formats them as plain text lines
/// 3. Writes to `config.log_file` (rotated at 10 MB, 3 backups) or stderr
///
/// Idempotent: only the first call in a process installs a subscriber. Returns
/// `false` if a subscriber was already set.
///
/// # Example
///
/// ```rust
/// use rowselect::observability::init_tracing;
/// use rowselect::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> bool {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| DEFAULT_TRACE_LEVEL.to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let installed = match &config.log_file {
        Some(path) => {
            let writer = FileWriter::new(crate::infrastructure::paths::expand_tilde(path));
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()
                .is_ok()
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .is_ok(),
    };

    if installed {
        tracing::debug!(level = %level, log_file = ?config.log_file, "tracing initialized");
    }
    installed
}
