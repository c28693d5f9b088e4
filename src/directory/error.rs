use crate::store::StoreError;
use thiserror::Error;

pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Errors surfaced to callers of directory operations
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The store rejected the operation
    #[error("{context}: {message}")]
    Persistence {
        context: &'static str,
        message: String,
    },

    #[error("companion {0} not found")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidInput(String),
}

impl DirectoryError {
    /// Wrap a store failure with the operation that hit it
    pub fn persistence(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |err| match err {
            StoreError::UnknownCompanion(id) => DirectoryError::NotFound(id),
            other => DirectoryError::Persistence {
                context,
                message: other.to_string(),
            },
        }
    }
}
