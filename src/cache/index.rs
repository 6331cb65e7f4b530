//! Item Index Module
//!
//! In-memory map from key to [`ItemRecord`]. Not synchronized on its own;
//! callers hold the cache lock.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::cache::ItemRecord;

// == Item Index ==
/// Authoritative record of the live cache entries.
#[derive(Debug, Default)]
pub struct ItemIndex {
    items: HashMap<String, ItemRecord>,
}

impl ItemIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ItemRecord> {
        self.items.get(key)
    }

    /// Installs a record, returning the one it replaced.
    pub fn put(&mut self, key: String, record: ItemRecord) -> Option<ItemRecord> {
        self.items.insert(key, record)
    }

    pub fn delete(&mut self, key: &str) -> Option<ItemRecord> {
        self.items.remove(key)
    }

    /// Snapshot of all keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.items.keys().cloned().collect()
    }

    /// Keys whose records are stale at `now`.
    pub fn expired_keys(&self, now: DateTime<Utc>) -> Vec<String> {
        self.items
            .iter()
            .filter(|(_, record)| record.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
