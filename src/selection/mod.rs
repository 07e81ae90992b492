//! Selection store: activated positions, non-clickable positions, and their
//! remapping under collection mutations.
//!
//! - [`remap`]: pure position translation for each [`crate::Mutation`] shape
//! - [`store`]: the [`SelectionStore`] container

pub mod remap;
pub mod store;

pub use remap::remap;
pub use store::{RemapReport, SelectionStore};
