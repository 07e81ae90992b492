//! Domain layer for the rowselect engine.
//!
//! This module contains the core vocabulary shared by the selection store, the
//! choice-mode state machine and the action-mode controller, independent of any
//! host toolkit or persistence concern.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`item`]: Position and identity types
//! - [`mutation`]: Collection mutation notifications
//!
//! # Examples
//!
//! ```
//! use rowselect::domain::{Identity, Mutation, Result};
//!
//! fn removal() -> Result<Mutation> {
//!     Ok(Mutation::Removed { start: 3, count: 2 })
//! }
//!
//! assert_eq!(removal().unwrap().kind(), "removed");
//! assert_eq!(Identity::new(7).get(), 7);
//! ```

pub mod error;
pub mod item;
pub mod mutation;

pub use error::{Result, RowSelectError};
pub use item::{Identity, Position};
pub use mutation::Mutation;
