//! Read-only queries. Reads are public: no caller identity is involved.

use serde::{Deserialize, Serialize};

use crate::{
    error::{LedgerError, LedgerResult},
    resource::{PageRequest, PageResponse, Resource, ResourceId, ResourceStore},
    store::KvStore,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryGetResourceRequest {
    pub id: ResourceId,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryGetResourceResponse {
    pub resource: Resource,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryAllResourceRequest {
    #[serde(default)]
    pub pagination: PageRequest,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryAllResourceResponse {
    pub resource: Vec<Resource>,
    pub pagination: PageResponse,
}

pub struct QueryService;

impl QueryService {
    pub fn resource<S: KvStore>(
        store: &S,
        req: &QueryGetResourceRequest,
    ) -> LedgerResult<QueryGetResourceResponse> {
        let resource =
            ResourceStore::get(store, req.id)?.ok_or(LedgerError::NotFound { id: req.id })?;
        Ok(QueryGetResourceResponse { resource })
    }

    pub fn resource_all<S: KvStore>(
        store: &S,
        req: &QueryAllResourceRequest,
    ) -> LedgerResult<QueryAllResourceResponse> {
        let (resource, pagination) = ResourceStore::page(store, &req.pagination)?;
        Ok(QueryAllResourceResponse {
            resource,
            pagination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        resource::Creator,
        service::{MsgCreateResource, ResourceService},
        store::MemStore,
    };

    fn populate(store: &mut MemStore, n: u64) {
        for i in 0..n {
            ResourceService::create_resource(
                store,
                MsgCreateResource {
                    creator: Creator::from(if i % 2 == 0 { "alice" } else { "bob" }),
                    name: format!("item-{i}"),
                    category: i + 1,
                },
            )
            .unwrap();
        }
    }

    #[test]
    fn show_returns_record_or_not_found() {
        let mut store = MemStore::new();
        populate(&mut store, 2);
        let resp = QueryService::resource(&store, &QueryGetResourceRequest { id: 2 }).unwrap();
        assert_eq!(resp.resource.creator.as_str(), "bob");
        assert_eq!(resp.resource.name, "item-1");

        let err = QueryService::resource(&store, &QueryGetResourceRequest { id: 3 }).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { id: 3 }));
    }

    #[test]
    fn list_walks_every_page() {
        let mut store = MemStore::new();
        populate(&mut store, 7);

        let mut req = QueryAllResourceRequest {
            pagination: PageRequest {
                limit: 3,
                ..PageRequest::default()
            },
        };
        let mut seen = Vec::new();
        loop {
            let resp = QueryService::resource_all(&store, &req).unwrap();
            seen.extend(resp.resource.iter().map(|r| r.id));
            match resp.pagination.next_key {
                Some(key) => req.pagination.key = Some(key),
                None => break,
            }
        }
        assert_eq!(seen, (1..=7).collect::<Vec<_>>());
    }

    #[test]
    fn list_rejects_key_with_offset() {
        let store = MemStore::new();
        let req = QueryAllResourceRequest {
            pagination: PageRequest {
                key: Some(1),
                offset: 2,
                ..PageRequest::default()
            },
        };
        let err = QueryService::resource_all(&store, &req).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidArgument);
    }
}
