//! Key layout of the Resource module inside the shared state tree.
//!
//! Two regions:
//! - `Resource/count/` holds the next unallocated id (8 bytes big-endian).
//! - `Resource/value/{id:8BE}` holds one record per Resource.
//!
//! Big-endian ids make byte order equal numeric order, so a prefix scan over
//! the value region yields Resources in ascending id order.

use crate::resource::ResourceId;

pub const RESOURCE_KEY_PREFIX: &[u8] = b"Resource/value/";
pub const RESOURCE_COUNT_KEY: &[u8] = b"Resource/count/";

pub fn resource_key(id: ResourceId) -> Vec<u8> {
    let mut key = Vec::with_capacity(RESOURCE_KEY_PREFIX.len() + 8);
    key.extend_from_slice(RESOURCE_KEY_PREFIX);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// Returns None if `key` is not a well-formed resource key.
pub fn decode_resource_key(key: &[u8]) -> Option<ResourceId> {
    let raw = key.strip_prefix(RESOURCE_KEY_PREFIX)?;
    Some(ResourceId::from_be_bytes(raw.try_into().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_key_round_trips() {
        let key = resource_key(42);
        assert!(key.starts_with(RESOURCE_KEY_PREFIX));
        assert_eq!(decode_resource_key(&key), Some(42));
    }

    #[test]
    fn byte_order_matches_numeric_order() {
        assert!(resource_key(9) < resource_key(10));
        assert!(resource_key(255) < resource_key(256));
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert_eq!(decode_resource_key(RESOURCE_COUNT_KEY), None);
        assert_eq!(decode_resource_key(b"Resource/value/short"), None);
    }
}
