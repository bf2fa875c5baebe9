use crate::{
    error::{LedgerError, LedgerResult},
    keys::RESOURCE_COUNT_KEY,
    resource::ResourceId,
    store::KvStore,
};

/// Id handed out by a store that has never allocated one.
pub const FIRST_RESOURCE_ID: ResourceId = 1;

/// Persisted counter issuing Resource ids.
///
/// The counter lives in the same store as the records, so an allocation made
/// inside a transaction that is later discarded is rolled back with it.
pub struct SequenceAllocator;

impl SequenceAllocator {
    /// Next id that [`SequenceAllocator::next`] will return.
    pub fn peek<S: KvStore>(store: &S) -> LedgerResult<ResourceId> {
        match store.get(RESOURCE_COUNT_KEY) {
            None => Ok(FIRST_RESOURCE_ID),
            Some(raw) => {
                let bytes: [u8; 8] = raw.as_slice().try_into().map_err(|_| {
                    LedgerError::codec(RESOURCE_COUNT_KEY, "counter is not 8 bytes")
                })?;
                Ok(ResourceId::from_be_bytes(bytes))
            }
        }
    }

    pub fn next<S: KvStore>(store: &mut S) -> LedgerResult<ResourceId> {
        let id = Self::peek(&*store)?;
        let advanced = id.checked_add(1).ok_or(LedgerError::SequenceExhausted)?;
        Self::set(store, advanced);
        Ok(id)
    }

    /// Overwrites the counter. Only genesis import calls this.
    pub fn set<S: KvStore>(store: &mut S, next: ResourceId) {
        store.set(RESOURCE_COUNT_KEY, next.to_be_bytes().to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CacheStore, MemStore};

    #[test]
    fn fresh_store_starts_at_first_id() {
        let mut store = MemStore::new();
        assert_eq!(SequenceAllocator::peek(&store).unwrap(), FIRST_RESOURCE_ID);
        assert_eq!(SequenceAllocator::next(&mut store).unwrap(), 1);
        assert_eq!(SequenceAllocator::next(&mut store).unwrap(), 2);
        assert_eq!(SequenceAllocator::peek(&store).unwrap(), 3);
    }

    #[test]
    fn counter_is_persisted_big_endian() {
        let mut store = MemStore::new();
        SequenceAllocator::set(&mut store, 0x0102);
        assert_eq!(
            store.get(RESOURCE_COUNT_KEY),
            Some(vec![0, 0, 0, 0, 0, 0, 1, 2])
        );
    }

    #[test]
    fn discarded_allocation_is_rolled_back() {
        let mut store = MemStore::new();
        let mut tx = CacheStore::new(&mut store);
        assert_eq!(SequenceAllocator::next(&mut tx).unwrap(), 1);
        tx.discard();
        assert_eq!(SequenceAllocator::next(&mut store).unwrap(), 1);
    }

    #[test]
    fn exhausted_counter_does_not_wrap() {
        let mut store = MemStore::new();
        SequenceAllocator::set(&mut store, u64::MAX);
        let err = SequenceAllocator::next(&mut store).unwrap_err();
        assert!(matches!(err, LedgerError::SequenceExhausted));
        assert_eq!(SequenceAllocator::peek(&store).unwrap(), u64::MAX);
    }

    #[test]
    fn malformed_counter_is_a_codec_error() {
        let mut store = MemStore::new();
        store.set(RESOURCE_COUNT_KEY, vec![1, 2, 3]);
        assert!(matches!(
            SequenceAllocator::peek(&store),
            Err(LedgerError::Codec { .. })
        ));
    }
}
