use std::collections::BTreeMap;

use super::{Key, KvStore, Value};

/// Write-buffering overlay over a parent store.
///
/// Reads see the overlay's own writes first. Nothing reaches the parent until
/// [`CacheStore::commit`]; dropping the overlay discards every buffered write.
pub struct CacheStore<'a, S: KvStore> {
    parent: &'a mut S,
    // `None` marks a pending delete.
    writes: BTreeMap<Key, Option<Value>>,
}

impl<'a, S: KvStore> CacheStore<'a, S> {
    pub fn new(parent: &'a mut S) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Number of buffered writes and deletes.
    pub fn pending(&self) -> usize {
        self.writes.len()
    }

    pub fn commit(self) {
        let CacheStore { parent, writes } = self;
        for (key, value) in writes {
            match value {
                Some(value) => parent.set(&key, value),
                None => parent.delete(&key),
            }
        }
    }

    pub fn discard(self) {}
}

impl<S: KvStore> KvStore for CacheStore<'_, S> {
    fn get(&self, key: &[u8]) -> Option<Value> {
        match self.writes.get(key) {
            Some(pending) => pending.clone(),
            None => self.parent.get(key),
        }
    }

    fn set(&mut self, key: &[u8], value: Value) {
        self.writes.insert(key.to_vec(), Some(value));
    }

    fn delete(&mut self, key: &[u8]) {
        self.writes.insert(key.to_vec(), None);
    }

    fn prefix_iter(&self, prefix: &[u8]) -> Vec<(Key, Value)> {
        let mut merged: BTreeMap<Key, Value> =
            self.parent.prefix_iter(prefix).into_iter().collect();
        let overlay = self
            .writes
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix));
        for (key, value) in overlay {
            match value {
                Some(value) => {
                    merged.insert(key.clone(), value.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
        merged.into_iter().collect()
    }
}
