//! `Vec`-backed bound collection.
//!
//! [`ListCollection`] is the list-backed call site: a plain vector of item
//! identities whose edit methods perform the change and return the matching
//! [`Mutation`] for the caller to forward to the engine. New items get fresh
//! identities from a monotonically increasing counter, so an identity is never
//! reused within one collection.

use crate::domain::{Identity, Mutation, Position, Result, RowSelectError};

use super::BoundCollection;

/// Ordered list of item identities with mutation reporting.
///
/// # Example
///
/// ```rust
/// use rowselect::binding::{BoundCollection, ListCollection};
/// use rowselect::Mutation;
///
/// let mut list = ListCollection::with_len(5);
/// let mutation = list.remove(1, 2)?;
/// assert_eq!(mutation, Mutation::Removed { start: 1, count: 2 });
/// assert_eq!(list.len(), 3);
/// # Ok::<(), rowselect::RowSelectError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCollection {
    items: Vec<Identity>,
    next_identity: u64,
}

impl ListCollection {
    /// Creates a list of `len` items with identities `0..len`.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        let mut list = Self::default();
        list.reset(len);
        list
    }

    /// Creates a list from explicit identities.
    ///
    /// Fresh identities handed out later start above the largest one given.
    #[must_use]
    pub fn from_identities(items: Vec<Identity>) -> Self {
        let next_identity = items
            .iter()
            .map(|id| id.get().saturating_add(1))
            .max()
            .unwrap_or(0);
        Self {
            items,
            next_identity,
        }
    }

    #[must_use]
    pub fn identities(&self) -> &[Identity] {
        &self.items
    }

    /// Inserts `count` new items so the first sits at `start`.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `start > len`.
    pub fn insert(&mut self, start: Position, count: usize) -> Result<Mutation> {
        if start > self.items.len() {
            return Err(RowSelectError::OutOfRange {
                position: start,
                len: self.items.len(),
            });
        }
        let fresh: Vec<_> = (0..count).map(|_| self.fresh_identity()).collect();
        self.items.splice(start..start, fresh);
        Ok(Mutation::Inserted { start, count })
    }

    /// Removes `count` items starting at `start`.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if the range extends past the end of the list.
    pub fn remove(&mut self, start: Position, count: usize) -> Result<Mutation> {
        self.check_range(start, count)?;
        self.items.drain(start..start + count);
        Ok(Mutation::Removed { start, count })
    }

    /// Moves the block `[from, from + count)` so it begins at `to`.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if either the source block or the destination block
    /// extends past the end of the list.
    pub fn move_range(&mut self, from: Position, to: Position, count: usize) -> Result<Mutation> {
        self.check_range(from, count)?;
        self.check_range(to, count)?;
        let block: Vec<_> = self.items.drain(from..from + count).collect();
        self.items.splice(to..to, block);
        Ok(Mutation::Moved { from, to, count })
    }

    /// Replaces the whole content with `len` fresh items.
    pub fn reset(&mut self, len: usize) -> Mutation {
        let items = (0..len).map(|_| self.fresh_identity()).collect();
        self.items = items;
        Mutation::Reset
    }

    fn fresh_identity(&mut self) -> Identity {
        let id = Identity::new(self.next_identity);
        self.next_identity = self.next_identity.saturating_add(1);
        id
    }

    fn check_range(&self, start: Position, count: usize) -> Result<()> {
        let len = self.items.len();
        match start.checked_add(count) {
            Some(end) if end <= len => Ok(()),
            _ => Err(RowSelectError::OutOfRange {
                position: start.saturating_add(count.max(1) - 1),
                len,
            }),
        }
    }
}

impl BoundCollection for ListCollection {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn identity_at(&self, position: Position) -> Identity {
        self.items[position]
    }
}
