use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    error::{LedgerError, LedgerResult},
    resource::{Resource, ResourceStore, UNSET_CATEGORY},
    sequence::{SequenceAllocator, FIRST_RESOURCE_ID},
    store::KvStore,
};

/// Module state as imported at chain start and exported for upgrades.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenesisState {
    #[serde(default)]
    pub resource_list: Vec<Resource>,
    /// Next id the allocator will hand out.
    pub resource_count: u64,
}

impl Default for GenesisState {
    fn default() -> Self {
        Self {
            resource_list: Vec::new(),
            resource_count: FIRST_RESOURCE_ID,
        }
    }
}

impl GenesisState {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.resource_count == 0 {
            return Err(LedgerError::InvalidGenesis(
                "resource count must be non-zero".into(),
            ));
        }
        let mut seen = BTreeSet::new();
        for resource in &self.resource_list {
            if !seen.insert(resource.id) {
                return Err(LedgerError::InvalidGenesis(format!(
                    "duplicated id {} for resource",
                    resource.id
                )));
            }
            if resource.id >= self.resource_count {
                return Err(LedgerError::InvalidGenesis(format!(
                    "resource id {} should be lower than the resource count {}",
                    resource.id, self.resource_count
                )));
            }
            if resource.category == UNSET_CATEGORY {
                return Err(LedgerError::InvalidGenesis(format!(
                    "resource {} has category 0",
                    resource.id
                )));
            }
        }
        Ok(())
    }
}

/// Validates `genesis` and writes it into `store`.
pub fn init_genesis<S: KvStore>(store: &mut S, genesis: &GenesisState) -> LedgerResult<()> {
    genesis.validate()?;
    for resource in &genesis.resource_list {
        ResourceStore::set(store, resource)?;
    }
    SequenceAllocator::set(store, genesis.resource_count);
    Ok(())
}

pub fn export_genesis<S: KvStore>(store: &S) -> LedgerResult<GenesisState> {
    Ok(GenesisState {
        resource_list: ResourceStore::list(store)?,
        resource_count: SequenceAllocator::peek(store)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    fn resource(id: u64) -> Resource {
        Resource {
            id,
            creator: "alice".into(),
            name: format!("r{id}"),
            category: 3,
        }
    }

    #[test]
    fn default_genesis_is_valid() {
        GenesisState::default().validate().unwrap();
    }

    #[test]
    fn rejects_duplicates_and_ids_past_the_counter() {
        let dup = GenesisState {
            resource_list: vec![resource(1), resource(1)],
            resource_count: 5,
        };
        assert!(matches!(dup.validate(), Err(LedgerError::InvalidGenesis(_))));

        let ahead = GenesisState {
            resource_list: vec![resource(5)],
            resource_count: 5,
        };
        assert!(ahead.validate().is_err());

        let mut zero = resource(1);
        zero.category = 0;
        let bad_category = GenesisState {
            resource_list: vec![zero],
            resource_count: 2,
        };
        assert!(bad_category.validate().is_err());
    }

    #[test]
    fn import_then_export_restores_state() {
        let genesis = GenesisState {
            resource_list: vec![resource(2), resource(4)],
            resource_count: 9,
        };
        let mut store = MemStore::new();
        init_genesis(&mut store, &genesis).unwrap();

        assert_eq!(SequenceAllocator::next(&mut store).unwrap(), 9);
        let exported = export_genesis(&store).unwrap();
        assert_eq!(exported.resource_list, genesis.resource_list);
        assert_eq!(exported.resource_count, 10);
    }

    #[test]
    fn invalid_genesis_writes_nothing() {
        let mut store = MemStore::new();
        let genesis = GenesisState {
            resource_list: vec![resource(3)],
            resource_count: 1,
        };
        assert!(init_genesis(&mut store, &genesis).is_err());
        assert!(store.is_empty());
    }
}
