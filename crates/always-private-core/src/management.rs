//! Whitelist management surface
//!
//! Everything the popup can do. The popup never talks to the interceptor;
//! both sides only meet in storage.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use always_private_interceptor::{BrowserApi, WindowInfo};
use always_private_whitelist::{host_of_url, ImportSummary, WhitelistStore};

use crate::error::CoreError;
use crate::Result;

/// Query flag that switches the popup page into its import layout
const IMPORT_MODE: &str = "import";

/// Which layout the popup page renders
///
/// File pickers are unreliable inside the transient toolbar popup, so
/// importing happens in a separate popup window opened with `?mode=import`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupMode {
    Inline,
    Import,
}

impl PopupMode {
    /// Mode requested by a popup page URL (absolute or relative)
    pub fn from_url(url: &str) -> Self {
        let Some((_, query)) = url.split_once('?') else {
            return PopupMode::Inline;
        };
        let query = query.split('#').next().unwrap_or_default();

        let import = url::form_urlencoded::parse(query.as_bytes())
            .any(|(key, value)| key == "mode" && value == IMPORT_MODE);

        if import {
            PopupMode::Import
        } else {
            PopupMode::Inline
        }
    }
}

#[derive(Clone)]
pub struct Management {
    whitelist: WhitelistStore,
    api: Arc<dyn BrowserApi>,
    popup_page: String,
    export_file_name: String,
}

impl Management {
    pub fn new(
        whitelist: WhitelistStore,
        api: Arc<dyn BrowserApi>,
        popup_page: String,
        export_file_name: String,
    ) -> Self {
        Self {
            whitelist,
            api,
            popup_page,
            export_file_name,
        }
    }

    pub fn list(&self) -> Result<Vec<String>> {
        Ok(self.whitelist.get()?)
    }

    /// Add a domain typed by the user
    pub fn add_domain(&self, input: &str) -> Result<bool> {
        Ok(self.whitelist.add(input.trim())?)
    }

    /// Whitelist the host of the active tab
    ///
    /// Returns the host, or `None` when there is no active tab or its URL
    /// has no host (`about:` pages and the like).
    pub fn add_current_tab_domain(&self) -> Result<Option<String>> {
        let Some(tab) = self.api.active_tab()? else {
            return Ok(None);
        };
        let Some(url) = tab.url.as_deref() else {
            return Ok(None);
        };

        match host_of_url(url) {
            Some(host) => {
                self.whitelist.add(&host)?;
                Ok(Some(host))
            }
            None => {
                tracing::warn!(url, "Active tab has no host to whitelist");
                Ok(None)
            }
        }
    }

    pub fn remove_domain(&self, domain: &str) -> Result<bool> {
        Ok(self.whitelist.remove(domain)?)
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(self.whitelist.export()?)
    }

    /// Write the export to `target`; a directory receives the default file name
    pub fn export_to(&self, target: &Path) -> Result<PathBuf> {
        let path = if target.is_dir() {
            target.join(&self.export_file_name)
        } else {
            target.to_path_buf()
        };

        std::fs::write(&path, self.export_json()?)?;
        tracing::info!(path = %path.display(), "Exported whitelist");
        Ok(path)
    }

    pub fn import_text(&self, text: &str) -> Result<ImportSummary> {
        Ok(self.whitelist.import_json(text)?)
    }

    pub fn import_file(&self, path: &Path) -> Result<ImportSummary> {
        let text = std::fs::read_to_string(path)?;
        self.import_text(&text)
    }

    /// Message shown to the user when an import is rejected
    pub fn import_error_message(error: &CoreError) -> String {
        let detail = match error {
            CoreError::Whitelist(inner) => inner.to_string(),
            other => other.to_string(),
        };
        format!("Error importing whitelist: {}", detail)
    }

    pub fn popup_url(&self, mode: PopupMode) -> String {
        match mode {
            PopupMode::Inline => self.popup_page.clone(),
            PopupMode::Import => format!("{}?mode={}", self.popup_page, IMPORT_MODE),
        }
    }

    /// Open the standalone popup window used for importing
    pub fn open_import_window(&self) -> Result<WindowInfo> {
        let window = self.api.create_popup_window(&self.popup_url(PopupMode::Import))?;
        tracing::debug!(window_id = window.id, "Opened import window");
        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use always_private_interceptor::{MemoryBrowser, WindowKind};
    use always_private_storage::MemoryStore;
    use std::collections::HashSet;

    fn management() -> (Management, MemoryBrowser) {
        let browser = MemoryBrowser::new();
        let whitelist = WhitelistStore::new(Arc::new(MemoryStore::new()));
        let management = Management::new(
            whitelist,
            Arc::new(browser.clone()),
            "popup.html".to_string(),
            "always-private-whitelist.json".to_string(),
        );
        (management, browser)
    }

    #[test]
    fn test_popup_mode_from_url() {
        assert_eq!(PopupMode::from_url("popup.html"), PopupMode::Inline);
        assert_eq!(PopupMode::from_url("popup.html?mode=import"), PopupMode::Import);
        assert_eq!(
            PopupMode::from_url("moz-extension://abc/popup.html?x=1&mode=import#top"),
            PopupMode::Import
        );
        assert_eq!(PopupMode::from_url("popup.html?mode=other"), PopupMode::Inline);
    }

    #[test]
    fn test_add_domain_trims() {
        let (m, _) = management();
        assert!(m.add_domain("  example.com \n").unwrap());
        assert!(!m.add_domain("example.com").unwrap());
        assert_eq!(m.list().unwrap(), vec!["example.com".to_string()]);
    }

    #[test]
    fn test_add_current_tab_domain() {
        let (m, browser) = management();
        let window = browser.open_window(false).unwrap();
        browser
            .open_tab(window.id, Some("https://docs.rs/url/latest"))
            .unwrap();

        assert_eq!(m.add_current_tab_domain().unwrap().as_deref(), Some("docs.rs"));
        assert_eq!(m.list().unwrap(), vec!["docs.rs".to_string()]);
    }

    #[test]
    fn test_add_current_tab_domain_without_host() {
        let (m, browser) = management();
        assert_eq!(m.add_current_tab_domain().unwrap(), None);

        let window = browser.open_window(false).unwrap();
        browser.open_tab(window.id, Some("about:blank")).unwrap();
        assert_eq!(m.add_current_tab_domain().unwrap(), None);
        assert!(m.list().unwrap().is_empty());
    }

    #[test]
    fn test_export_to_directory_uses_default_name() {
        let (m, _) = management();
        m.add_domain("a.com").unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = m.export_to(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("always-private-whitelist.json"));

        let written: Vec<String> =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, vec!["a.com".to_string()]);
    }

    #[test]
    fn test_import_file_merges() {
        let (m, _) = management();
        m.add_domain("b.com").unwrap();
        m.add_domain("c.com").unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.json");
        std::fs::write(&path, r#"["a.com", "b.com"]"#).unwrap();

        let summary = m.import_file(&path).unwrap();
        assert_eq!(summary.added, 1);

        let list: HashSet<String> = m.list().unwrap().into_iter().collect();
        let expected: HashSet<String> = ["a.com", "b.com", "c.com"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(list, expected);
    }

    #[test]
    fn test_import_error_is_reported_and_list_untouched() {
        let (m, _) = management();
        m.add_domain("keep.com").unwrap();

        let err = m.import_text(r#""not-an-array""#).unwrap_err();
        assert_eq!(
            Management::import_error_message(&err),
            "Error importing whitelist: Invalid format: not an array."
        );
        assert_eq!(m.list().unwrap(), vec!["keep.com".to_string()]);
    }

    #[test]
    fn test_open_import_window() {
        let (m, browser) = management();
        let window = m.open_import_window().unwrap();
        assert_eq!(window.kind, WindowKind::Popup);

        let tabs = browser.tabs();
        assert_eq!(tabs.len(), 1);
        let url = tabs[0].url.clone().unwrap();
        assert_eq!(url, "popup.html?mode=import");
        assert_eq!(PopupMode::from_url(&url), PopupMode::Import);
    }
}
