use serde::{Deserialize, Serialize};

use crate::resource::{Category, Creator, ResourceId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgCreateResource {
    pub creator: Creator,
    pub name: String,
    pub category: Category,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgCreateResourceResponse {
    pub id: ResourceId,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgUpdateResource {
    pub creator: Creator,
    pub id: ResourceId,
    pub name: String,
    pub category: Category,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgUpdateResourceResponse {}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgDeleteResource {
    pub creator: Creator,
    pub id: ResourceId,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MsgDeleteResourceResponse {}

/// Any state-mutating request the module accepts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Msg {
    CreateResource(MsgCreateResource),
    UpdateResource(MsgUpdateResource),
    DeleteResource(MsgDeleteResource),
}

impl Msg {
    /// The authenticated identity the request is bound to.
    pub fn signer(&self) -> &Creator {
        match self {
            Msg::CreateResource(msg) => &msg.creator,
            Msg::UpdateResource(msg) => &msg.creator,
            Msg::DeleteResource(msg) => &msg.creator,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Msg::CreateResource(_) => "create_resource",
            Msg::UpdateResource(_) => "update_resource",
            Msg::DeleteResource(_) => "delete_resource",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MsgResponse {
    CreateResource(MsgCreateResourceResponse),
    UpdateResource(MsgUpdateResourceResponse),
    DeleteResource(MsgDeleteResourceResponse),
}
