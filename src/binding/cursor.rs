//! Cursor-backed collection over a paged row source.
//!
//! [`CursorCollection`] binds the engine to data that is not held in memory: a
//! query result, a table on disk, a remote listing. The row count is captured
//! when the cursor is (re)queried; identities are read through a
//! [`RowSource`] one page at a time and cached. A requery swaps the result set
//! wholesale, so it reports [`Mutation::Reset`].
//!
//! Lookups take `&self`, so the page cache sits behind a `RefCell`. The
//! collection is single-threaded like the engine it feeds.

use crate::domain::{Identity, Mutation, Position};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::BoundCollection;

/// Default number of rows fetched per page.
pub const DEFAULT_PAGE_SIZE: usize = 64;

/// Default number of pages kept in the cache.
pub const DEFAULT_MAX_PAGES: usize = 8;

/// Row accessor behind a [`CursorCollection`].
pub trait RowSource {
    /// Number of rows in the current result set.
    fn row_count(&self) -> usize;

    /// Stable identities of rows `[offset, offset + limit)`.
    ///
    /// May return fewer rows than asked for at the end of the result set.
    fn fetch_rows(&self, offset: Position, limit: usize) -> Vec<Identity>;
}

impl RowSource for Vec<Identity> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn fetch_rows(&self, offset: Position, limit: usize) -> Vec<Identity> {
        self.iter().skip(offset).take(limit).copied().collect()
    }
}

#[derive(Debug, Default)]
struct PageCache {
    /// Rows keyed by page number (`position / page_size`).
    pages: HashMap<usize, Vec<Identity>>,
    /// Page numbers in load order, oldest first.
    order: Vec<usize>,
}

/// [`BoundCollection`] that reads identities through a paged [`RowSource`].
///
/// # Example
///
/// ```rust
/// use rowselect::binding::{CursorCollection, RecordingHost};
/// use rowselect::{ChoiceMode, Identity, SelectionEngine};
///
/// let rows: Vec<Identity> = (100..110).map(Identity::new).collect();
/// let mut cursor = CursorCollection::new(rows);
/// let mut engine = SelectionEngine::with_choice_mode(RecordingHost::default(), ChoiceMode::Multiple);
///
/// engine.tap(&cursor, 3)?;
/// assert_eq!(engine.activated_identities(), vec![Identity::new(103)]);
///
/// let mutation = cursor.requery();
/// engine.on_mutation(&cursor, mutation);
/// assert_eq!(engine.activated_count(), 0);
/// # Ok::<(), rowselect::RowSelectError>(())
/// ```
#[derive(Debug)]
pub struct CursorCollection<R: RowSource> {
    source: R,
    len: usize,
    page_size: usize,
    max_pages: usize,
    cache: RefCell<PageCache>,
    fetches: Cell<usize>,
}

impl<R: RowSource> CursorCollection<R> {
    /// Opens a cursor over `source` with default paging.
    #[must_use]
    pub fn new(source: R) -> Self {
        Self::with_paging(source, DEFAULT_PAGE_SIZE, DEFAULT_MAX_PAGES)
    }

    /// Opens a cursor with `page_size` rows per fetch, caching at most
    /// `max_pages` pages. Zero values are raised to one.
    #[must_use]
    pub fn with_paging(source: R, page_size: usize, max_pages: usize) -> Self {
        let len = source.row_count();
        tracing::debug!(len, page_size, max_pages, "cursor opened");
        Self {
            source,
            len,
            page_size: page_size.max(1),
            max_pages: max_pages.max(1),
            cache: RefCell::new(PageCache::default()),
            fetches: Cell::new(0),
        }
    }

    #[must_use]
    pub const fn source(&self) -> &R {
        &self.source
    }

    /// Mutable access to the source. Changes become visible at the next
    /// [`requery`](Self::requery).
    pub fn source_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Re-runs the query: drops cached pages and re-reads the row count.
    pub fn requery(&mut self) -> Mutation {
        self.len = self.source.row_count();
        let cache = self.cache.get_mut();
        cache.pages.clear();
        cache.order.clear();
        tracing::debug!(len = self.len, "cursor requeried");
        Mutation::Reset
    }

    /// Replaces the source and requeries.
    pub fn swap_source(&mut self, source: R) -> Mutation {
        self.source = source;
        self.requery()
    }

    /// Number of page fetches issued so far.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }

    fn load_page(&self, page: usize) -> Vec<Identity> {
        let offset = page * self.page_size;
        let rows = self.source.fetch_rows(offset, self.page_size);
        self.fetches.set(self.fetches.get() + 1);
        tracing::trace!(page, offset, rows = rows.len(), "page fetched");
        rows
    }
}

impl<R: RowSource> BoundCollection for CursorCollection<R> {
    fn len(&self) -> usize {
        self.len
    }

    fn identity_at(&self, position: Position) -> Identity {
        let page = position / self.page_size;
        let index = position % self.page_size;
        let mut cache = self.cache.borrow_mut();

        if !cache.pages.contains_key(&page) {
            let rows = self.load_page(page);
            if cache.order.len() >= self.max_pages {
                let evicted = cache.order.remove(0);
                cache.pages.remove(&evicted);
            }
            cache.order.push(page);
            cache.pages.insert(page, rows);
        }

        match cache.pages.get(&page).and_then(|rows| rows.get(index)) {
            Some(&identity) => identity,
            None => {
                // source shrank without a requery
                tracing::warn!(position, len = self.len, "row missing from source, using position identity");
                Identity::new(position as u64)
            }
        }
    }
}
