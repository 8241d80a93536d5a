//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] always_private_storage::StorageError),

    #[error("Whitelist error: {0}")]
    Whitelist(#[from] always_private_whitelist::WhitelistError),

    #[error("Browser error: {0}")]
    Platform(#[from] always_private_interceptor::PlatformError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
