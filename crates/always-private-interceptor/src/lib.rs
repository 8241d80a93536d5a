//! Always Private Navigation Interceptor
//!
//! Decides, per top-level navigation, whether the page may load in the
//! window it was requested from or must be reopened in a private window:
//!
//! 1. Sub-frame requests pass through untouched
//! 2. Requests from a private tab pass through (no redirect loops)
//! 3. Duplicate firings inside the debounce window are dropped
//! 4. Whitelisted hosts load normally
//! 5. Everything else is cancelled and reopened privately
//!
//! The browser itself is reached only through [`BrowserApi`], supplied at
//! construction.

mod error;
mod event;
mod interceptor;
mod memory;
mod platform;

pub use error::PlatformError;
pub use event::{NavigationEvent, RequestType, TabId, WindowId};
pub use interceptor::{
    BlockingResponse, Decision, IgnoreReason, Interceptor, InterceptorConfig, PrivateSurface,
    DEFAULT_DEBOUNCE,
};
pub use memory::MemoryBrowser;
pub use platform::{BrowserApi, TabInfo, WindowInfo, WindowKind, BLANK_PAGES};

pub type Result<T> = std::result::Result<T, PlatformError>;
