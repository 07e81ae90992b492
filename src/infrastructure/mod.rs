//! Platform utilities: filesystem locations for logs and snapshots.
//!
//! - [`paths`]: tilde expansion and default data directory

pub mod paths;

pub use paths::{default_state_file, expand_tilde, get_data_dir};
