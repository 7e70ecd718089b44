//! Error types for the record index.

use thiserror::Error;

use crate::record::RecordId;

/// Result type alias using [`IndexError`].
pub type Result<T> = std::result::Result<T, IndexError>;

/// Errors returned by the index and its collaborators.
///
/// None of these leave the tree in a modified state: a failed lookup,
/// update or delete never touches the structure.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("no record with id {id}")]
    NotFound { id: RecordId },

    #[error("a record with id {id} already exists")]
    DuplicateKey { id: RecordId },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logger already initialised: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl IndexError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::NotFound { .. })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn io_error_conversion() {
        let err: IndexError = IoError::new(ErrorKind::NotFound, "records.txt").into();
        assert!(matches!(err, IndexError::Io(_)));
        assert!(err.to_string().contains("records.txt"));
    }

    #[test]
    fn messages_name_the_id() {
        assert_eq!(IndexError::NotFound { id: 7 }.to_string(), "no record with id 7");
        assert_eq!(IndexError::DuplicateKey { id: 3 }.to_string(), "a record with id 3 already exists");
        assert!(IndexError::NotFound { id: 1 }.is_not_found());
        assert!(!IndexError::DuplicateKey { id: 1 }.is_not_found());
    }

    #[test]
    fn parse_error_carries_line() {
        let err = IndexError::Parse { line: 4, reason: "missing score".into() };
        assert_eq!(err.to_string(), "line 4: missing score");
    }
}
