use thiserror::Error;

use crate::resource::{Creator, ResourceId};

/// Coarse classification the host uses to turn a failure into an abort result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    /// Stable numeric code reported to the host in abort results.
    pub fn code(self) -> u32 {
        match self {
            ErrorKind::Internal => 1,
            ErrorKind::Unauthorized => 4,
            ErrorKind::InvalidArgument => 18,
            ErrorKind::NotFound => 38,
        }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("category cannot be 0")]
    InvalidCategory,
    #[error("pagination key and offset cannot both be set")]
    InvalidPagination,
    #[error("key {id} doesn't exist")]
    NotFound { id: ResourceId },
    #[error("incorrect owner: {caller} does not own resource {id}")]
    Unauthorized { id: ResourceId, caller: Creator },
    #[error("resource sequence exhausted")]
    SequenceExhausted,
    #[error("malformed value under key {key}: {reason}")]
    Codec { key: String, reason: String },
    #[error("invalid genesis: {0}")]
    InvalidGenesis(String),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidCategory | LedgerError::InvalidPagination => {
                ErrorKind::InvalidArgument
            }
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::Unauthorized { .. } => ErrorKind::Unauthorized,
            LedgerError::SequenceExhausted
            | LedgerError::Codec { .. }
            | LedgerError::InvalidGenesis(_) => ErrorKind::Internal,
        }
    }

    pub fn code(&self) -> u32 {
        self.kind().code()
    }

    pub(crate) fn codec(key: &[u8], reason: impl ToString) -> Self {
        LedgerError::Codec {
            key: hex::encode(key),
            reason: reason.to_string(),
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_registered_codes() {
        assert_eq!(LedgerError::InvalidCategory.code(), 18);
        assert_eq!(LedgerError::NotFound { id: 7 }.code(), 38);
        let err = LedgerError::Unauthorized {
            id: 7,
            caller: Creator::from("bob"),
        };
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.code(), 4);
        assert_eq!(LedgerError::SequenceExhausted.kind(), ErrorKind::Internal);
    }

    #[test]
    fn not_found_message_names_the_key() {
        let err = LedgerError::NotFound { id: 999 };
        assert_eq!(err.to_string(), "key 999 doesn't exist");
    }
}
