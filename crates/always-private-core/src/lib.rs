//! Always Private Core
//!
//! Wires the whitelist store and the navigation interceptor to storage and
//! to a browser adapter, and exposes the management operations the popup
//! drives.

mod config;
mod error;
mod extension;
mod management;

pub use config::Config;
pub use error::CoreError;
pub use extension::Extension;
pub use management::{Management, PopupMode};

// Re-export core components
pub use always_private_interceptor::{
    BlockingResponse, BrowserApi, Decision, IgnoreReason, Interceptor, InterceptorConfig,
    MemoryBrowser, NavigationEvent, PlatformError, PrivateSurface, RequestType, TabInfo,
    WindowInfo,
};
pub use always_private_storage::{Database, KeyValueStore, MemoryStore, StorageError};
pub use always_private_whitelist::{
    host_of_url, normalize_domain, ImportSummary, WhitelistError, WhitelistStore,
    EXPORT_FILE_NAME,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks debug over info.
pub fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    fmt()
        .with_env_filter(log_filter(from_env.as_deref(), verbose))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn log_filter(from_env: Option<&str>, verbose: bool) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    let fallback = if verbose { "debug" } else { "info" };

    from_env
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_directives_win_over_verbose() {
        let filter = log_filter(Some("warn"), true).to_string().to_lowercase();
        assert!(filter.contains("warn"));
        assert!(!filter.contains("debug"));
    }

    #[test]
    fn test_verbose_is_fallback() {
        assert!(log_filter(None, true)
            .to_string()
            .to_lowercase()
            .contains("debug"));
        assert!(log_filter(Some("  "), false)
            .to_string()
            .to_lowercase()
            .contains("info"));
    }

    #[test]
    fn test_unparsable_env_falls_back() {
        let filter = log_filter(Some("app=notalevel"), false).to_string().to_lowercase();
        assert!(filter.contains("info"));
    }
}
