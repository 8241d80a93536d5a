//! Platform error types

use thiserror::Error;

use crate::event::{TabId, WindowId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Tab not found: {0}")]
    TabNotFound(TabId),

    #[error("Window not found: {0}")]
    WindowNotFound(WindowId),

    #[error("Browser API unavailable: {0}")]
    Unavailable(String),
}
