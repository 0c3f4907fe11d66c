//! Index error types

use thiserror::Error;
use uuid::Uuid;

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors raised while defining or populating an index
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Index definition has no fields
    #[error("Index definition must name at least one field")]
    NoFields,

    /// A field appears twice in the definition
    #[error("Duplicate index field: {0}")]
    DuplicateField(String),

    /// Object id already present in the index
    #[error("Duplicate object id: {0}")]
    DuplicateObjectId(Uuid),
}

impl IndexError {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            IndexError::NoFields => "RANGE_INDEX_NO_FIELDS",
            IndexError::DuplicateField(_) => "RANGE_INDEX_DUPLICATE_FIELD",
            IndexError::DuplicateObjectId(_) => "RANGE_INDEX_DUPLICATE_OBJECT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(IndexError::NoFields.code(), "RANGE_INDEX_NO_FIELDS");
        assert_eq!(
            IndexError::DuplicateField("a".into()).code(),
            "RANGE_INDEX_DUPLICATE_FIELD"
        );
    }

    #[test]
    fn test_error_display() {
        let err = IndexError::DuplicateField("Age".to_string());
        assert!(err.to_string().contains("Age"));
    }
}
