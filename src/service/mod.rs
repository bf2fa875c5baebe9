//! Create/Update/Delete handlers.
//!
//! Each handler runs inside the caller's transaction (`store`) and checks
//! every precondition before its first write, so a rejected request leaves
//! the store untouched. Update and Delete check existence before ownership:
//! a caller probing an id that was never created sees `NotFound`, never
//! `Unauthorized`.

use tracing::debug;

use crate::{
    error::{LedgerError, LedgerResult},
    resource::{Category, Creator, Resource, ResourceId, ResourceStore, UNSET_CATEGORY},
    sequence::SequenceAllocator,
    store::KvStore,
};

mod msgs;

pub use msgs::{
    Msg, MsgCreateResource, MsgCreateResourceResponse, MsgDeleteResource,
    MsgDeleteResourceResponse, MsgResponse, MsgUpdateResource, MsgUpdateResourceResponse,
};

pub struct ResourceService;

impl ResourceService {
    pub fn handle<S: KvStore>(store: &mut S, msg: Msg) -> LedgerResult<MsgResponse> {
        match msg {
            Msg::CreateResource(msg) => {
                Self::create_resource(store, msg).map(MsgResponse::CreateResource)
            }
            Msg::UpdateResource(msg) => {
                Self::update_resource(store, msg).map(MsgResponse::UpdateResource)
            }
            Msg::DeleteResource(msg) => {
                Self::delete_resource(store, msg).map(MsgResponse::DeleteResource)
            }
        }
    }

    pub fn create_resource<S: KvStore>(
        store: &mut S,
        msg: MsgCreateResource,
    ) -> LedgerResult<MsgCreateResourceResponse> {
        validate_category(msg.category)?;

        let id = SequenceAllocator::next(store)?;
        let resource = Resource {
            id,
            creator: msg.creator,
            name: msg.name,
            category: msg.category,
        };
        ResourceStore::set(store, &resource)?;
        debug!(id, creator = %resource.creator, category = resource.category, "resource created");

        Ok(MsgCreateResourceResponse { id })
    }

    pub fn update_resource<S: KvStore>(
        store: &mut S,
        msg: MsgUpdateResource,
    ) -> LedgerResult<MsgUpdateResourceResponse> {
        ensure_owner(&*store, msg.id, &msg.creator)?;
        validate_category(msg.category)?;

        let resource = Resource {
            id: msg.id,
            creator: msg.creator,
            name: msg.name,
            category: msg.category,
        };
        ResourceStore::set(store, &resource)?;
        debug!(
            id = resource.id,
            creator = %resource.creator,
            category = resource.category,
            "resource updated"
        );

        Ok(MsgUpdateResourceResponse {})
    }

    pub fn delete_resource<S: KvStore>(
        store: &mut S,
        msg: MsgDeleteResource,
    ) -> LedgerResult<MsgDeleteResourceResponse> {
        ensure_owner(&*store, msg.id, &msg.creator)?;

        ResourceStore::delete(store, msg.id);
        debug!(id = msg.id, creator = %msg.creator, "resource deleted");

        Ok(MsgDeleteResourceResponse {})
    }
}

fn validate_category(category: Category) -> LedgerResult<()> {
    if category == UNSET_CATEGORY {
        return Err(LedgerError::InvalidCategory);
    }
    Ok(())
}

fn ensure_owner<S: KvStore>(
    store: &S,
    id: ResourceId,
    caller: &Creator,
) -> LedgerResult<Resource> {
    let existing = ResourceStore::get(store, id)?.ok_or(LedgerError::NotFound { id })?;
    if existing.creator != *caller {
        return Err(LedgerError::Unauthorized {
            id,
            caller: caller.clone(),
        });
    }
    Ok(existing)
}
