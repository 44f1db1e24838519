use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    DuplicateUser(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    EventFull(String),
    #[error("{0}")]
    AlreadyRegistered(String),
    #[error("{0}")]
    NotRegistered(String),
    #[error("key-value store operation failed")]
    KeyValueStoreError(#[from] redis::RedisError),
    #[error("failed to convert a stored record")]
    ConversionEntityError(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
