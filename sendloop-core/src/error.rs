use thiserror::Error;
use uuid::Uuid;

pub type CoreResult<T> = Result<T, CoreError>;

/// Error taxonomy for the fallible (storage-touching) operations.
///
/// Statistics, stage mapping, and the access policy are pure and never
/// return these; only task and progress operations do.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed input to a create/update operation. Never partially applied.
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(Uuid),

    /// The persistence layer failed. Surfaced as-is; retry policy belongs
    /// to the caller.
    #[error("storage error: {0}")]
    Storage(String),
}

impl CoreError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Storage(error.to_string())
    }
}
