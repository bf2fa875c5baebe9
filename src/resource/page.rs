use serde::{Deserialize, Serialize};

use super::ResourceId;
use crate::error::{LedgerError, LedgerResult};

/// Page size used when a request leaves `limit` at zero.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    /// Resume from this id (inclusive). Exclusive with `offset`.
    pub key: Option<ResourceId>,
    pub offset: u64,
    pub limit: u64,
    pub count_total: bool,
    pub reverse: bool,
}

impl PageRequest {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.key.is_some() && self.offset > 0 {
            return Err(LedgerError::InvalidPagination);
        }
        Ok(())
    }

    pub fn effective_limit(&self) -> u64 {
        if self.limit == 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            self.limit
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// First id after this page, if any. Feed it back as `PageRequest::key`.
    pub next_key: Option<ResourceId>,
    pub total: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_and_offset_are_exclusive() {
        let req = PageRequest {
            key: Some(3),
            offset: 1,
            ..PageRequest::default()
        };
        assert!(matches!(req.validate(), Err(LedgerError::InvalidPagination)));
    }

    #[test]
    fn zero_limit_uses_default() {
        assert_eq!(PageRequest::default().effective_limit(), DEFAULT_PAGE_LIMIT);
        let req = PageRequest {
            limit: 7,
            ..PageRequest::default()
        };
        assert_eq!(req.effective_limit(), 7);
    }
}
