//! Browser capability interface
//!
//! Every browser call the extension makes goes through [`BrowserApi`]. An
//! adapter per runtime implements it; [`MemoryBrowser`](crate::MemoryBrowser)
//! is the in-process one.

use serde::{Deserialize, Serialize};

use crate::event::{TabId, WindowId};
use crate::Result;

/// URLs of a tab that has been opened but has not loaded anything yet
pub const BLANK_PAGES: &[&str] = &[
    "about:blank",
    "about:newtab",
    "about:home",
    "chrome://newtab/",
    "edge://newtab/",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: TabId,
    pub window_id: WindowId,
    /// Current URL; `None` while a fresh tab has not committed one
    pub url: Option<String>,
    pub incognito: bool,
    pub active: bool,
}

impl TabInfo {
    /// Whether the tab still shows nothing but a placeholder page
    pub fn is_blank(&self) -> bool {
        match self.url.as_deref() {
            None => true,
            Some(url) => url.is_empty() || BLANK_PAGES.contains(&url),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    Normal,
    Popup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub id: WindowId,
    pub incognito: bool,
    pub kind: WindowKind,
}

pub trait BrowserApi: Send + Sync {
    /// Look up a tab; [`PlatformError::TabNotFound`](crate::PlatformError::TabNotFound)
    /// if it has been closed
    fn get_tab(&self, tab_id: TabId) -> Result<TabInfo>;

    /// Active tab of the focused window
    fn active_tab(&self) -> Result<Option<TabInfo>>;

    /// Any open private window that can take a new tab
    fn find_private_window(&self) -> Result<Option<WindowInfo>>;

    fn create_tab(&self, window_id: WindowId, url: &str, active: bool) -> Result<TabInfo>;

    fn focus_window(&self, window_id: WindowId) -> Result<()>;

    fn create_private_window(&self, url: &str) -> Result<WindowInfo>;

    /// Small standalone window used by the management surface
    fn create_popup_window(&self, url: &str) -> Result<WindowInfo>;

    fn remove_tab(&self, tab_id: TabId) -> Result<()>;
}
