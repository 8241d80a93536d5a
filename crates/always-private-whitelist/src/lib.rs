//! Always Private Whitelist
//!
//! The user-curated set of hostnames that are allowed to load in a normal
//! window. Everything else is reopened in a private window.
//!
//! Entries are always bare hostnames. Input is run through URL parsing
//! before it is stored or compared, and membership is exact equality:
//! `example.com` does not cover `www.example.com`.

mod domain;
mod error;
mod store;

pub use domain::{host_of_url, normalize_domain};
pub use error::WhitelistError;
pub use store::{ImportSummary, WhitelistStore, EXPORT_FILE_NAME, WHITELIST_KEY};

pub type Result<T> = std::result::Result<T, WhitelistError>;
