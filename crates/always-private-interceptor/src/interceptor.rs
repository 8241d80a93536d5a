//! Redirect decision
//!
//! [`Interceptor::handle`] never fails: every browser call is guarded and
//! a failure degrades to the conservative outcome (treat as not
//! whitelisted, skip cleanup) instead of propagating into the request
//! pipeline.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use always_private_whitelist::{host_of_url, WhitelistStore};

use crate::event::{NavigationEvent, TabId, WindowId};
use crate::platform::BrowserApi;

/// Duplicate firings observed in practice land within a few milliseconds
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterceptorConfig {
    /// Events closer than this to the last processed one are dropped.
    /// Zero disables debouncing.
    pub debounce: Duration,
}

impl InterceptorConfig {
    pub fn with_debounce_ms(ms: u64) -> Self {
        Self {
            debounce: Duration::from_millis(ms),
        }
    }
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// Not a top-level document request
    SubFrame,
    /// Already loading in a private context
    PrivateOrigin,
    /// Duplicate of a just-processed event
    Debounced,
}

/// Where a redirected navigation was reopened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrivateSurface {
    /// New tab in an already open private window
    Tab { window_id: WindowId, tab_id: TabId },
    /// Freshly created private window
    Window { window_id: WindowId },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Ignored { reason: IgnoreReason },
    Allowed { host: String },
    /// Original request cancelled. `surface` is `None` when the private
    /// window could not be opened.
    Redirected {
        host: Option<String>,
        surface: Option<PrivateSurface>,
    },
}

impl Decision {
    pub fn cancels(&self) -> bool {
        matches!(self, Decision::Redirected { .. })
    }

    pub fn response(&self) -> BlockingResponse {
        BlockingResponse {
            cancel: self.cancels(),
        }
    }
}

/// What the blocking request listener hands back to the browser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingResponse {
    pub cancel: bool,
}

pub struct Interceptor {
    api: Arc<dyn BrowserApi>,
    whitelist: WhitelistStore,
    config: InterceptorConfig,
    /// Timestamp of the last event that made it past the debounce check
    last_processed: Mutex<Option<DateTime<Utc>>>,
}

impl Interceptor {
    pub fn new(
        api: Arc<dyn BrowserApi>,
        whitelist: WhitelistStore,
        config: InterceptorConfig,
    ) -> Self {
        Self {
            api,
            whitelist,
            config,
            last_processed: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &InterceptorConfig {
        &self.config
    }

    /// Decide what happens to one navigation and carry out the redirect
    pub fn handle(&self, event: &NavigationEvent) -> Decision {
        if !event.is_main_frame() {
            tracing::trace!(url = %event.url, kind = %event.request_type, "Ignoring non main-frame request");
            return Decision::Ignored {
                reason: IgnoreReason::SubFrame,
            };
        }

        if self.is_private_origin(event) {
            tracing::trace!(url = %event.url, "Request already private");
            return Decision::Ignored {
                reason: IgnoreReason::PrivateOrigin,
            };
        }

        if !self.pass_debounce(event.time_stamp) {
            tracing::debug!(url = %event.url, "Debounced duplicate navigation event");
            return Decision::Ignored {
                reason: IgnoreReason::Debounced,
            };
        }

        let host = host_of_url(&event.url);
        match host.as_deref() {
            Some(host) if self.is_whitelisted(host) => {
                tracing::debug!(host, "Whitelisted, allowing navigation");
                return Decision::Allowed {
                    host: host.to_string(),
                };
            }
            Some(_) => {}
            None => {
                tracing::debug!(url = %event.url, "No host in URL, treating as not whitelisted");
            }
        }

        let surface = self.open_private(&event.url);
        self.close_blank_origin(event);

        tracing::info!(
            host = host.as_deref().unwrap_or(""),
            tab_id = ?event.owning_tab(),
            reopened = surface.is_some(),
            "Redirected navigation to private window"
        );

        Decision::Redirected { host, surface }
    }

    fn is_private_origin(&self, event: &NavigationEvent) -> bool {
        if event.incognito == Some(true) {
            return true;
        }

        let Some(tab_id) = event.owning_tab() else {
            return false;
        };

        match self.api.get_tab(tab_id) {
            Ok(tab) => tab.incognito,
            Err(e) => {
                tracing::debug!(tab_id, error = %e, "Origin tab lookup failed");
                false
            }
        }
    }

    fn pass_debounce(&self, at: DateTime<Utc>) -> bool {
        let mut last = self.last_processed.lock();

        if let Some(previous) = *last {
            if !self.config.debounce.is_zero() {
                // Gap in either direction: clocks can step backwards
                let gap = if at >= previous {
                    at - previous
                } else {
                    previous - at
                };
                let within_window = gap
                    .to_std()
                    .map(|gap| gap < self.config.debounce)
                    .unwrap_or(false);
                if within_window {
                    return false;
                }
            }
        }

        *last = Some(at);
        true
    }

    fn is_whitelisted(&self, host: &str) -> bool {
        match self.whitelist.contains(host) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(host, error = %e, "Whitelist unavailable, treating as not whitelisted");
                false
            }
        }
    }

    fn open_private(&self, url: &str) -> Option<PrivateSurface> {
        match self.api.find_private_window() {
            Ok(Some(window)) => match self.api.create_tab(window.id, url, true) {
                Ok(tab) => {
                    if let Err(e) = self.api.focus_window(window.id) {
                        tracing::debug!(window_id = window.id, error = %e, "Could not focus private window");
                    }
                    return Some(PrivateSurface::Tab {
                        window_id: window.id,
                        tab_id: tab.id,
                    });
                }
                Err(e) => {
                    tracing::debug!(window_id = window.id, error = %e, "Private window went away, opening a new one");
                }
            },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Could not query private windows");
            }
        }

        match self.api.create_private_window(url) {
            Ok(window) => Some(PrivateSurface::Window {
                window_id: window.id,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to open private window");
                None
            }
        }
    }

    /// Best effort: the browser may close or navigate the tab under us
    fn close_blank_origin(&self, event: &NavigationEvent) {
        let Some(tab_id) = event.owning_tab() else {
            return;
        };

        match self.api.get_tab(tab_id) {
            Ok(tab) if tab.is_blank() => {
                if let Err(e) = self.api.remove_tab(tab_id) {
                    tracing::debug!(tab_id, error = %e, "Blank origin tab already gone");
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(tab_id, error = %e, "Origin tab already gone");
            }
        }
    }
}
