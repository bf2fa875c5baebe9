use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{LedgerError, LedgerResult},
    keys::{decode_resource_key, resource_key, RESOURCE_KEY_PREFIX},
    store::KvStore,
};

mod page;

pub use page::{PageRequest, PageResponse, DEFAULT_PAGE_LIMIT};

pub type ResourceId = u64;
pub type Category = u64;

/// Reserved category value meaning "unset". Never valid in a write.
pub const UNSET_CATEGORY: Category = 0;

/// Authenticated caller identity, as supplied by the host.
///
/// The module only ever compares identities; it never parses or verifies them.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Creator(String);

impl Creator {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Creator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Creator {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Creator {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub id: ResourceId,
    pub creator: Creator,
    pub name: String,
    pub category: Category,
}

/// On-disk value; the id lives in the key.
#[derive(Serialize, Deserialize)]
struct StoredResource {
    creator: Creator,
    name: String,
    category: Category,
}

impl Resource {
    fn encode(&self) -> LedgerResult<Vec<u8>> {
        let stored = StoredResource {
            creator: self.creator.clone(),
            name: self.name.clone(),
            category: self.category,
        };
        serde_json::to_vec(&stored).map_err(|e| LedgerError::codec(&resource_key(self.id), e))
    }

    fn decode(id: ResourceId, raw: &[u8]) -> LedgerResult<Self> {
        let stored: StoredResource =
            serde_json::from_slice(raw).map_err(|e| LedgerError::codec(&resource_key(id), e))?;
        Ok(Self {
            id,
            creator: stored.creator,
            name: stored.name,
            category: stored.category,
        })
    }
}

/// Id-keyed access to Resource records inside a store.
///
/// Everything returned is a copy; the store keeps the canonical record.
pub struct ResourceStore;

impl ResourceStore {
    pub fn get<S: KvStore>(store: &S, id: ResourceId) -> LedgerResult<Option<Resource>> {
        store
            .get(&resource_key(id))
            .map(|raw| Resource::decode(id, &raw))
            .transpose()
    }

    /// Upsert by id.
    pub fn set<S: KvStore>(store: &mut S, resource: &Resource) -> LedgerResult<()> {
        let value = resource.encode()?;
        store.set(&resource_key(resource.id), value);
        Ok(())
    }

    /// Deleting an absent id is a no-op.
    pub fn delete<S: KvStore>(store: &mut S, id: ResourceId) {
        store.delete(&resource_key(id));
    }

    /// Every stored Resource in ascending id order.
    pub fn list<S: KvStore>(store: &S) -> LedgerResult<Vec<Resource>> {
        store
            .prefix_iter(RESOURCE_KEY_PREFIX)
            .into_iter()
            .map(|(key, raw)| {
                let id = decode_resource_key(&key)
                    .ok_or_else(|| LedgerError::codec(&key, "malformed resource key"))?;
                Resource::decode(id, &raw)
            })
            .collect()
    }

    pub fn count<S: KvStore>(store: &S) -> usize {
        store.prefix_iter(RESOURCE_KEY_PREFIX).len()
    }

    pub fn page<S: KvStore>(
        store: &S,
        request: &PageRequest,
    ) -> LedgerResult<(Vec<Resource>, PageResponse)> {
        request.validate()?;
        let mut all = Self::list(store)?;
        if request.reverse {
            all.reverse();
        }
        let total = all.len() as u64;

        let start = match request.key {
            Some(key) if request.reverse => all.iter().position(|r| r.id <= key),
            Some(key) => all.iter().position(|r| r.id >= key),
            None => Some(usize::try_from(request.offset).unwrap_or(usize::MAX)),
        }
        .unwrap_or(all.len())
        .min(all.len());

        let limit = usize::try_from(request.effective_limit()).unwrap_or(usize::MAX);
        let end = start.saturating_add(limit).min(all.len());
        let next_key = all.get(end).map(|r| r.id);
        let items = all.drain(start..end).collect();

        Ok((
            items,
            PageResponse {
                next_key,
                total: request.count_total.then_some(total),
            },
        ))
    }
}
