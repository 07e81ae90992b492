//! Mutation notifications pushed by the bound collection.
//!
//! The collection reports every structural change as one of four shapes. The
//! engine never looks at the collection's contents while remapping; the shape
//! alone determines where each held position ends up.

use serde::{Deserialize, Serialize};

use super::Position;

/// Structural change to the bound collection.
///
/// Ranges are expressed in the coordinates the collection had *before* the
/// change, except for [`Mutation::Moved::to`], which is the index the first
/// moved item occupies *after* the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mutation {
    /// The whole collection was reloaded; no position or identity carries over.
    Reset,

    /// `count` items were inserted so the first new item sits at `start`.
    Inserted {
        /// Index of the first inserted item.
        start: Position,
        /// Number of inserted items.
        count: usize,
    },

    /// `count` items starting at `start` were removed.
    Removed {
        /// Index of the first removed item.
        start: Position,
        /// Number of removed items.
        count: usize,
    },

    /// The block `[from, from + count)` was relocated to begin at `to`.
    Moved {
        /// Index of the first moved item before the move.
        from: Position,
        /// Index of the first moved item after the move.
        to: Position,
        /// Size of the moved block.
        count: usize,
    },
}

impl Mutation {
    /// Returns `true` if applying the mutation cannot change any position.
    ///
    /// ```
    /// use rowselect::Mutation;
    ///
    /// assert!(Mutation::Inserted { start: 3, count: 0 }.is_noop());
    /// assert!(Mutation::Moved { from: 2, to: 2, count: 4 }.is_noop());
    /// assert!(!Mutation::Reset.is_noop());
    /// ```
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        match *self {
            Self::Reset => false,
            Self::Inserted { count, .. } | Self::Removed { count, .. } => count == 0,
            Self::Moved { from, to, count } => count == 0 || from == to,
        }
    }

    /// Short name used in tracing fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Inserted { .. } => "inserted",
            Self::Removed { .. } => "removed",
            Self::Moved { .. } => "moved",
        }
    }
}
