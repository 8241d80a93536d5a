//! Whitelist error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WhitelistError {
    #[error("Storage error: {0}")]
    Storage(#[from] always_private_storage::StorageError),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
