use thiserror::Error as ThisError;

/// Unified error kind for all service-level storage operations.
///
/// Every failure coming out of the underlying client capability is wrapped
/// into [`StorageError::Operation`], keeping the original failure as the
/// source so the cause chain survives end to end. The only conditions that
/// are not wrapped are the two normalized-to-boolean cases (bucket existence
/// check failure and object-not-found on an existence check) and caller side
/// argument errors, which surface as [`StorageError::InvalidArgument`]
/// before any network call is made.
#[derive(Debug, ThisError)]
pub enum StorageError {
    /// Caller-supplied argument out of range, detected locally.
    #[error("{message}")]
    InvalidArgument { message: String },

    /// Any failure reported by the underlying store client.
    #[error("[StorageError] {message}")]
    Operation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StorageError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        StorageError::InvalidArgument {
            message: message.into(),
        }
    }

    /// An operation failure with no distinct underlying cause, e.g. a
    /// per-key error reported inside an otherwise successful bulk delete.
    pub fn operation(message: impl Into<String>) -> Self {
        StorageError::Operation {
            message: message.into(),
            source: None,
        }
    }

    pub fn operation_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StorageError::Operation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for service-level storage operations
pub type StorageResult<T> = Result<T, StorageError>;
