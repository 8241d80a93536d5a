//! Always Private Storage Layer
//!
//! Key-value persistence for extension state. The whitelist lives under a
//! single key as a JSON array of strings.

mod database;
mod error;
mod migrations;
mod store;

pub use database::Database;
pub use error::StorageError;
pub use store::{KeyValueStore, KeyValueStoreExt, MemoryStore};

pub type Result<T> = std::result::Result<T, StorageError>;
