//! In-memory list backend.
//!
//! Keeps the last saved snapshot in memory. Clones share the same snapshot,
//! so a test can hand one clone to a service and inspect another.

use crate::models::ItemRecord;
use crate::storage::traits::ListStore;
use crate::{Error, Result};
use std::sync::{Arc, Mutex};

/// Non-persistent list store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Arc<Mutex<Vec<ItemRecord>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `items`.
    #[must_use]
    pub fn with_items(items: Vec<ItemRecord>) -> Self {
        Self {
            snapshot: Arc::new(Mutex::new(items)),
        }
    }
}

impl ListStore for MemoryStore {
    fn load(&self) -> Result<Vec<ItemRecord>> {
        self.snapshot
            .lock()
            .map(|items| items.clone())
            .map_err(|e| Error::operation("load_memory_snapshot", e))
    }

    fn save(&self, items: &[ItemRecord]) -> Result<()> {
        let mut snapshot = self
            .snapshot
            .lock()
            .map_err(|e| Error::operation("save_memory_snapshot", e))?;
        *snapshot = items.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
