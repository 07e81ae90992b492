//! Snapshot persistence across host teardown.
//!
//! - [`backend`]: the [`StateStore`] trait
//! - [`json`]: atomic JSON file store
//! - [`memory`]: in-process store
//! - [`models`]: stored record types

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::StateStore;
pub use json::JsonStateStore;
pub use memory::MemoryStateStore;
pub use models::SnapshotRecord;
