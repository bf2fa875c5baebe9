//! Ordered byte-keyed storage used by the Resource module.
//!
//! The module never talks to a concrete database. Every handler receives a
//! `&mut impl KvStore`, which in production is a [`CacheStore`] opened by the
//! host for the duration of one transaction and backed by the committed
//! [`MemStore`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod cache;
mod commitment;

pub use cache::CacheStore;
pub use commitment::{state_root, StateRoot};

pub type Key = Vec<u8>;
pub type Value = Vec<u8>;

pub trait KvStore {
    fn get(&self, key: &[u8]) -> Option<Value>;

    fn set(&mut self, key: &[u8], value: Value);

    /// Removing an absent key is a no-op.
    fn delete(&mut self, key: &[u8]);

    fn has(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// All entries whose key starts with `prefix`, in ascending key order.
    /// Each call enumerates the current contents afresh.
    fn prefix_iter(&self, prefix: &[u8]) -> Vec<(Key, Value)>;
}

/// The committed state tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemStore {
    #[serde(with = "hex_map")]
    entries: BTreeMap<Key, Value>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KvStore for MemStore {
    fn get(&self, key: &[u8]) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &[u8], value: Value) {
        self.entries.insert(key.to_vec(), value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.entries.remove(key);
    }

    fn has(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    fn prefix_iter(&self, prefix: &[u8]) -> Vec<(Key, Value)> {
        self.entries
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Serializes byte keys and values as hex strings so the state file stays
/// readable JSON.
mod hex_map {
    use std::collections::BTreeMap;

    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(
        value: &BTreeMap<Vec<u8>, Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded: BTreeMap<String, String> = value
            .iter()
            .map(|(k, v)| (hex::encode(k), hex::encode(v)))
            .collect();
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = BTreeMap::<String, String>::deserialize(deserializer)?;
        encoded
            .into_iter()
            .map(|(k, v)| -> Result<(Vec<u8>, Vec<u8>), D::Error> {
                let key = hex::decode(&k).map_err(D::Error::custom)?;
                let value = hex::decode(&v).map_err(D::Error::custom)?;
                Ok((key, value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_iter_is_ordered_and_bounded() {
        let mut store = MemStore::new();
        store.set(b"b/2", b"two".to_vec());
        store.set(b"a/9", b"other".to_vec());
        store.set(b"b/1", b"one".to_vec());
        store.set(b"c/0", b"other".to_vec());
        let keys: Vec<_> = store.prefix_iter(b"b/").into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![b"b/1".to_vec(), b"b/2".to_vec()]);
    }

    #[test]
    fn delete_of_absent_key_is_noop() {
        let mut store = MemStore::new();
        store.set(b"k", b"v".to_vec());
        store.delete(b"missing");
        assert_eq!(store.len(), 1);
        store.delete(b"k");
        assert!(store.is_empty());
    }

    #[test]
    fn json_round_trip_keeps_binary_keys() {
        let mut store = MemStore::new();
        store.set(&[0, 0, 0, 1], vec![0xff, 0x00]);
        let json = serde_json::to_string(&store).unwrap();
        assert!(json.contains("00000001"));
        let back: MemStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }
}
