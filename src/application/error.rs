use thiserror::Error;

use crate::application::repos::RepoError;

/// Caller-visible error taxonomy.
///
/// Cache failures never appear here; they are logged and suppressed inside
/// the engine. Only repository outcomes and pre-engine argument validation
/// surface to callers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("resource not found")]
    NotFound,
    #[error("resource already exists: {0}")]
    AlreadyExists(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound,
            RepoError::Duplicate { constraint } => AppError::AlreadyExists(constraint),
            other => AppError::Internal(other.to_string()),
        }
    }
}
