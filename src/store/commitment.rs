use sha2::{Digest, Sha256};

use super::KvStore;

pub type StateRoot = [u8; 32];

/// Merkle root over every committed key/value pair, in key order.
pub fn state_root<S: KvStore>(store: &S) -> StateRoot {
    let leaves = store
        .prefix_iter(&[])
        .into_iter()
        .map(|(key, value)| {
            let mut hasher = Sha256::new();
            hasher.update(b"kv");
            hasher.update((key.len() as u64).to_be_bytes());
            hasher.update(&key);
            hasher.update(&value);
            hasher.finalize().into()
        })
        .collect();
    build_merkle(leaves)
}

fn build_merkle(mut leaves: Vec<[u8; 32]>) -> [u8; 32] {
    if leaves.is_empty() {
        return Sha256::digest(b"crude-empty-state").into();
    }
    while leaves.len() > 1 {
        let mut next = Vec::with_capacity(leaves.len().div_ceil(2));
        for chunk in leaves.chunks(2) {
            let mut hasher = Sha256::new();
            hasher.update(b"node");
            hasher.update(chunk[0]);
            // odd node is paired with itself
            hasher.update(chunk.get(1).unwrap_or(&chunk[0]));
            next.push(hasher.finalize().into());
        }
        leaves = next;
    }
    leaves[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    #[test]
    fn root_is_deterministic_and_tracks_content() {
        let mut store = MemStore::new();
        let empty = state_root(&store);
        store.set(b"a", b"1".to_vec());
        store.set(b"b", b"2".to_vec());
        store.set(b"c", b"3".to_vec());
        let root1 = state_root(&store);
        let root2 = state_root(&store);
        assert_eq!(root1, root2);
        assert_ne!(root1, empty);

        store.set(b"c", b"4".to_vec());
        assert_ne!(state_root(&store), root1);
    }

    #[test]
    fn key_value_boundary_is_unambiguous() {
        let mut left = MemStore::new();
        left.set(b"ab", b"c".to_vec());
        let mut right = MemStore::new();
        right.set(b"a", b"bc".to_vec());
        assert_ne!(state_root(&left), state_root(&right));
    }
}
