//! Error types for the rowselect engine.
//!
//! This module defines the centralized error type [`RowSelectError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Errors raised by the engine itself are precondition violations: the caller passed
//! a position outside the collection, or asked for a transition the current state
//! does not allow. They are reported synchronously and never retried. The remaining
//! variants come from the optional persistence and configuration layers.

use thiserror::Error;

use crate::domain::Position;

/// The main error type for rowselect operations.
///
/// # Examples
///
/// ```
/// use rowselect::RowSelectError;
///
/// let err = RowSelectError::OutOfRange { position: 12, len: 10 };
/// assert_eq!(err.to_string(), "position 12 out of range for collection of length 10");
/// ```
#[derive(Debug, Error)]
pub enum RowSelectError {
    /// A position argument was outside `[0, len)` of the bound collection.
    ///
    /// Never clamped: the engine leaves its state untouched and reports the
    /// offending position together with the length it was checked against.
    #[error("position {position} out of range for collection of length {len}")]
    OutOfRange {
        /// The rejected position.
        position: Position,
        /// Collection length at the time of the call.
        len: usize,
    },

    /// The requested operation is not allowed in the current action-mode state.
    ///
    /// The engine's internal state is left unchanged when this is returned.
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// A saved state snapshot is internally inconsistent.
    ///
    /// Occurs when the parallel position/identity arrays have different lengths
    /// or a position is listed twice.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Snapshot storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RowSelectError {
    /// Returns `true` for errors that signal a caller precondition violation.
    ///
    /// ```
    /// use rowselect::RowSelectError;
    ///
    /// assert!(RowSelectError::OutOfRange { position: 3, len: 2 }.is_precondition());
    /// assert!(!RowSelectError::Storage("disk full".into()).is_precondition());
    /// ```
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::OutOfRange { .. } | Self::InvalidStateTransition(_)
        )
    }
}

/// A specialized `Result` type for rowselect operations.
pub type Result<T> = std::result::Result<T, RowSelectError>;
