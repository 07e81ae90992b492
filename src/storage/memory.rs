//! In-memory snapshot store.
//!
//! Survives host teardown only as long as the process does. Useful when the
//! host recreates its views without restarting, and in tests.

use crate::domain::error::Result;
use crate::engine::SavedState;
use crate::storage::backend::StateStore;
use crate::storage::models::SnapshotRecord;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    records: HashMap<String, SnapshotRecord>,
}

impl MemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn save(&mut self, key: &str, state: &SavedState) -> Result<()> {
        state.validate()?;
        let save_count = self.records.get(key).map_or(0, |r| r.save_count);
        let mut record = SnapshotRecord::new(key, state.clone());
        record.save_count = save_count.saturating_add(1);
        self.records.insert(key.to_string(), record);
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<SavedState>> {
        Ok(self.records.get(key).map(|r| r.state.clone()))
    }

    fn record(&self, key: &str) -> Result<Option<SnapshotRecord>> {
        Ok(self.records.get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        Ok(self.records.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<_> = self.records.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
