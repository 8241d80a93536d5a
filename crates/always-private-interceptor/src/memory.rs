//! In-process browser model
//!
//! Keeps windows and tabs in memory and applies the same rules a real
//! browser would: removing the last tab of a window closes the window,
//! creating an active tab deactivates its siblings.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::PlatformError;
use crate::event::{TabId, WindowId};
use crate::platform::{BrowserApi, TabInfo, WindowInfo, WindowKind};
use crate::Result;

#[derive(Debug, Default)]
struct BrowserState {
    windows: BTreeMap<WindowId, WindowInfo>,
    tabs: BTreeMap<TabId, TabInfo>,
    focused_window: Option<WindowId>,
    next_id: i64,
    window_creation_blocked: bool,
}

impl BrowserState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn open_window(&mut self, incognito: bool, kind: WindowKind) -> Result<WindowInfo> {
        if self.window_creation_blocked {
            return Err(PlatformError::Unavailable(
                "window creation is blocked".to_string(),
            ));
        }

        let window = WindowInfo {
            id: self.next_id(),
            incognito,
            kind,
        };
        self.windows.insert(window.id, window.clone());
        self.focused_window = Some(window.id);
        Ok(window)
    }

    fn open_tab(&mut self, window_id: WindowId, url: Option<&str>, active: bool) -> Result<TabInfo> {
        let incognito = self
            .windows
            .get(&window_id)
            .map(|w| w.incognito)
            .ok_or(PlatformError::WindowNotFound(window_id))?;

        let has_tabs = self.tabs.values().any(|t| t.window_id == window_id);
        let active = active || !has_tabs;
        if active {
            for tab in self.tabs.values_mut().filter(|t| t.window_id == window_id) {
                tab.active = false;
            }
        }

        let tab = TabInfo {
            id: self.next_id(),
            window_id,
            url: url.map(str::to_string),
            incognito,
            active,
        };
        self.tabs.insert(tab.id, tab.clone());
        Ok(tab)
    }
}

/// Shared, cloneable in-memory browser
#[derive(Debug, Default, Clone)]
pub struct MemoryBrowser {
    state: Arc<RwLock<BrowserState>>,
}

impl MemoryBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a normal or private window with no tabs
    pub fn open_window(&self, incognito: bool) -> Result<WindowInfo> {
        self.state.write().open_window(incognito, WindowKind::Normal)
    }

    /// Open a tab without going through navigation; `None` models a fresh
    /// tab that has not committed a URL yet
    pub fn open_tab(&self, window_id: WindowId, url: Option<&str>) -> Result<TabInfo> {
        self.state.write().open_tab(window_id, url, true)
    }

    pub fn windows(&self) -> Vec<WindowInfo> {
        self.state.read().windows.values().cloned().collect()
    }

    pub fn tabs(&self) -> Vec<TabInfo> {
        self.state.read().tabs.values().cloned().collect()
    }

    pub fn private_tabs(&self) -> Vec<TabInfo> {
        self.state
            .read()
            .tabs
            .values()
            .filter(|t| t.incognito)
            .cloned()
            .collect()
    }

    pub fn focused_window(&self) -> Option<WindowId> {
        self.state.read().focused_window
    }

    /// Make every window creation fail, as a browser does when private
    /// browsing is disabled by policy
    pub fn block_window_creation(&self, blocked: bool) {
        self.state.write().window_creation_blocked = blocked;
    }
}

impl BrowserApi for MemoryBrowser {
    fn get_tab(&self, tab_id: TabId) -> Result<TabInfo> {
        self.state
            .read()
            .tabs
            .get(&tab_id)
            .cloned()
            .ok_or(PlatformError::TabNotFound(tab_id))
    }

    fn active_tab(&self) -> Result<Option<TabInfo>> {
        let state = self.state.read();
        let Some(window_id) = state.focused_window else {
            return Ok(None);
        };

        Ok(state
            .tabs
            .values()
            .find(|t| t.window_id == window_id && t.active)
            .cloned())
    }

    fn find_private_window(&self) -> Result<Option<WindowInfo>> {
        Ok(self
            .state
            .read()
            .windows
            .values()
            .find(|w| w.incognito && w.kind == WindowKind::Normal)
            .cloned())
    }

    fn create_tab(&self, window_id: WindowId, url: &str, active: bool) -> Result<TabInfo> {
        self.state.write().open_tab(window_id, Some(url), active)
    }

    fn focus_window(&self, window_id: WindowId) -> Result<()> {
        let mut state = self.state.write();
        if !state.windows.contains_key(&window_id) {
            return Err(PlatformError::WindowNotFound(window_id));
        }
        state.focused_window = Some(window_id);
        Ok(())
    }

    fn create_private_window(&self, url: &str) -> Result<WindowInfo> {
        let mut state = self.state.write();
        let window = state.open_window(true, WindowKind::Normal)?;
        state.open_tab(window.id, Some(url), true)?;
        Ok(window)
    }

    fn create_popup_window(&self, url: &str) -> Result<WindowInfo> {
        let mut state = self.state.write();
        let window = state.open_window(false, WindowKind::Popup)?;
        state.open_tab(window.id, Some(url), true)?;
        Ok(window)
    }

    fn remove_tab(&self, tab_id: TabId) -> Result<()> {
        let mut guard = self.state.write();
        let state = &mut *guard;
        let tab = state
            .tabs
            .remove(&tab_id)
            .ok_or(PlatformError::TabNotFound(tab_id))?;

        let window_empty = !state.tabs.values().any(|t| t.window_id == tab.window_id);
        if window_empty {
            state.windows.remove(&tab.window_id);
            if state.focused_window == Some(tab.window_id) {
                state.focused_window = state.windows.keys().next_back().copied();
            }
        } else if tab.active {
            if let Some(next) = state
                .tabs
                .values_mut()
                .rev()
                .find(|t| t.window_id == tab.window_id)
            {
                next.active = true;
            }
        }

        tracing::debug!(tab_id, window_id = tab.window_id, "Removed tab");
        Ok(())
    }
}
