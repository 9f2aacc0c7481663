use super::{PresenceError, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Presence error: {0}")]
    PresenceError(#[from] PresenceError),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
