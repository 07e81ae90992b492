//! Activated-position map and non-clickable set.
//!
//! [`SelectionStore`] is the passive half of the engine: it holds which
//! positions are activated (and under which identity) and which are
//! non-clickable, and rewrites both when the collection mutates. It knows
//! nothing about choice modes or the overlay; input range checks and policy
//! live in [`crate::engine`].

use crate::domain::{Identity, Mutation, Position};
use std::collections::{HashMap, HashSet};

use super::remap::remap;

/// Outcome of applying a mutation to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemapReport {
    /// Activated entries whose item was removed (or forgotten by a reset).
    pub dropped_activations: usize,
    /// Non-clickable entries whose item was removed (or forgotten by a reset).
    pub dropped_non_clickable: usize,
    /// Entries (of either kind) included above whose remapped position fell
    /// outside the collection, meaning the mutation did not match the collection.
    pub out_of_range: usize,
}

/// Position-keyed selection state.
///
/// # Example
///
/// ```rust
/// use rowselect::selection::SelectionStore;
/// use rowselect::{Identity, Mutation};
///
/// let mut store = SelectionStore::new();
/// store.activate(1, Identity::new(10));
/// store.activate(4, Identity::new(40));
/// store.apply_mutation(Mutation::Removed { start: 3, count: 2 }, 8);
///
/// assert_eq!(store.activated_positions(), vec![1]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    activated: HashMap<Position, Identity>,
    non_clickable: HashSet<Position>,
}

impl SelectionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from explicit entries, as read back from a snapshot.
    #[must_use]
    pub fn from_parts(
        activated: impl IntoIterator<Item = (Position, Identity)>,
        non_clickable: impl IntoIterator<Item = Position>,
    ) -> Self {
        Self {
            activated: activated.into_iter().collect(),
            non_clickable: non_clickable.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_activated(&self, position: Position) -> bool {
        self.activated.contains_key(&position)
    }

    /// Identity recorded when `position` was activated.
    #[must_use]
    pub fn identity(&self, position: Position) -> Option<Identity> {
        self.activated.get(&position).copied()
    }

    #[must_use]
    pub fn activated_count(&self) -> usize {
        self.activated.len()
    }

    #[must_use]
    pub fn has_activations(&self) -> bool {
        !self.activated.is_empty()
    }

    /// Activated positions in ascending order.
    ///
    /// Callers must not rely on the order; it is sorted only to make logs and
    /// snapshots reproducible.
    #[must_use]
    pub fn activated_positions(&self) -> Vec<Position> {
        let mut positions: Vec<_> = self.activated.keys().copied().collect();
        positions.sort_unstable();
        positions
    }

    /// Identities of all activated items, in activated-position order.
    #[must_use]
    pub fn activated_identities(&self) -> Vec<Identity> {
        self.activated_entries().into_iter().map(|(_, id)| id).collect()
    }

    /// `(position, identity)` pairs sorted by position.
    #[must_use]
    pub fn activated_entries(&self) -> Vec<(Position, Identity)> {
        let mut entries: Vec<_> = self.activated.iter().map(|(&p, &id)| (p, id)).collect();
        entries.sort_unstable_by_key(|&(p, _)| p);
        entries
    }

    /// Marks `position` activated. Returns `true` if it was not activated before.
    pub fn activate(&mut self, position: Position, identity: Identity) -> bool {
        self.activated.insert(position, identity).is_none()
    }

    /// Clears `position`. Returns the identity it carried, if any.
    pub fn deactivate(&mut self, position: Position) -> Option<Identity> {
        self.activated.remove(&position)
    }

    /// Clears every activation and returns the positions that were activated, sorted.
    pub fn clear_activated(&mut self) -> Vec<Position> {
        let mut drained: Vec<_> = self.activated.drain().map(|(p, _)| p).collect();
        drained.sort_unstable();
        drained
    }

    #[must_use]
    pub fn is_clickable(&self, position: Position) -> bool {
        !self.non_clickable.contains(&position)
    }

    /// Sets clickability. Returns `true` only if the state actually flipped.
    pub fn set_clickable(&mut self, position: Position, clickable: bool) -> bool {
        if clickable {
            self.non_clickable.remove(&position)
        } else {
            self.non_clickable.insert(position)
        }
    }

    /// Non-clickable positions in ascending order.
    #[must_use]
    pub fn non_clickable_positions(&self) -> Vec<Position> {
        let mut positions: Vec<_> = self.non_clickable.iter().copied().collect();
        positions.sort_unstable();
        positions
    }

    /// Rewrites every held position according to `mutation`.
    ///
    /// `len` is the collection length after the mutation. Entries whose item no
    /// longer exists are dropped, and so are entries remapped to `len` or
    /// beyond. Identities travel with their entries unchanged. A reset empties
    /// both collections.
    pub fn apply_mutation(&mut self, mutation: Mutation, len: usize) -> RemapReport {
        let _span = tracing::trace_span!("apply_mutation",
            kind = mutation.kind(),
            activated = self.activated.len(),
            non_clickable = self.non_clickable.len()
        )
        .entered();

        let before_activated = self.activated.len();
        let before_non_clickable = self.non_clickable.len();
        let mut out_of_range = 0;

        if mutation == Mutation::Reset {
            self.activated.clear();
            self.non_clickable.clear();
        } else {
            let mut in_range = |p: Position| {
                let keep = p < len;
                if !keep {
                    out_of_range += 1;
                }
                keep
            };
            let noop = mutation.is_noop();
            let moved = |p: Position| if noop { Some(p) } else { remap(p, mutation) };

            self.activated = self
                .activated
                .drain()
                .filter_map(|(p, id)| moved(p).filter(|&np| in_range(np)).map(|np| (np, id)))
                .collect();
            self.non_clickable = self
                .non_clickable
                .drain()
                .filter_map(|p| moved(p).filter(|&np| in_range(np)))
                .collect();
        }

        let report = RemapReport {
            dropped_activations: before_activated - self.activated.len(),
            dropped_non_clickable: before_non_clickable - self.non_clickable.len(),
            out_of_range,
        };
        if report.out_of_range > 0 {
            tracing::warn!(
                kind = mutation.kind(),
                len,
                out_of_range = report.out_of_range,
                "mutation does not match collection, dropped positions past the end"
            );
        }
        tracing::trace!(
            dropped_activations = report.dropped_activations,
            dropped_non_clickable = report.dropped_non_clickable,
            "store remapped"
        );
        report
    }
}
