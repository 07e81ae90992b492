//! Position translation under collection mutations.
//!
//! [`remap`] answers one question: where does an item that sat at `position`
//! before a [`Mutation`] sit afterwards? `None` means the item is gone (it was
//! removed, or the collection was reset and nothing can be trusted).
//!
//! # Moved
//!
//! `Moved { from, to, count }` relocates the block `[from, from + count)` so that
//! it starts at `to`. Items between the old and new location (the band) close
//! the gap, shifting by `count` the other way:
//!
//! ```text
//! from=1 to=4 count=2      before: a [b c] d e f g
//!                          after:  a d e f [b c] g
//! ```
//!
//! With `lo = min(from, to)` and `hi = max(from, to)`, positions below `lo` or at
//! or beyond `hi + count` are outside the affected window and keep their index.
//!
//! A mutation whose arithmetic would overflow `usize` cannot describe a real
//! collection; positions it would push past `usize::MAX` map to `None`.

use crate::domain::{Mutation, Position};

/// Translates a single pre-mutation position to its post-mutation position.
///
/// # Examples
///
/// ```
/// use rowselect::selection::remap;
/// use rowselect::Mutation;
///
/// let removed = Mutation::Removed { start: 4, count: 3 };
/// assert_eq!(remap(2, removed), Some(2));
/// assert_eq!(remap(5, removed), None);
/// assert_eq!(remap(8, removed), Some(5));
///
/// let moved = Mutation::Moved { from: 0, to: 3, count: 1 };
/// assert_eq!(remap(0, moved), Some(3));
/// assert_eq!(remap(2, moved), Some(1));
/// ```
#[must_use]
pub fn remap(position: Position, mutation: Mutation) -> Option<Position> {
    match mutation {
        Mutation::Reset => None,
        Mutation::Inserted { start, count } => remap_inserted(position, start, count),
        Mutation::Removed { start, count } => remap_removed(position, start, count),
        Mutation::Moved { from, to, count } => remap_moved(position, from, to, count),
    }
}

const fn remap_inserted(position: Position, start: Position, count: usize) -> Option<Position> {
    if position >= start {
        position.checked_add(count)
    } else {
        Some(position)
    }
}

fn remap_removed(position: Position, start: Position, count: usize) -> Option<Position> {
    let end = start.saturating_add(count);
    if position < start {
        Some(position)
    } else if position < end {
        None
    } else {
        Some(position - count)
    }
}

fn remap_moved(position: Position, from: Position, to: Position, count: usize) -> Option<Position> {
    if count == 0 || from == to {
        return Some(position);
    }

    let lo = from.min(to);
    let hi = from.max(to);
    if position < lo || position >= hi.saturating_add(count) {
        return Some(position);
    }

    if position >= from && position < from.saturating_add(count) {
        // inside the moved block
        if to > from {
            position.checked_add(to - from)
        } else {
            Some(position - (from - to))
        }
    } else if from < to {
        Some(position - count)
    } else {
        position.checked_add(count)
    }
}
