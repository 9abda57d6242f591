//! In-process dedup store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use feedhook_core::{Item, MatchOutcome};

use crate::error::Result;
use crate::{SeenStore, StoredEntry};

/// Keeps recorded entries in a map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySeenStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemorySeenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<StoredEntry> {
        self.entries
            .read()
            .expect("entries lock poisoned")
            .get(id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("entries lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SeenStore for MemorySeenStore {
    async fn seen(&self, id: &str) -> Result<bool> {
        Ok(self
            .entries
            .read()
            .expect("entries lock poisoned")
            .contains_key(id))
    }

    async fn record(&self, item: &Item, outcome: &MatchOutcome) -> Result<()> {
        self.entries
            .write()
            .expect("entries lock poisoned")
            .entry(item.id.clone())
            .or_insert_with(|| StoredEntry::new(item, outcome));
        Ok(())
    }
}
