//! Application state management

use always_private_core::{Config, Extension, MemoryBrowser, Result};
use std::sync::Arc;

/// The extension plus the in-process browser it drives
pub struct AppState {
    extension: Extension,
    browser: MemoryBrowser,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let browser = MemoryBrowser::new();
        let extension = Extension::new(config, Arc::new(browser.clone()))?;

        Ok(Self { extension, browser })
    }

    pub fn extension(&self) -> &Extension {
        &self.extension
    }

    pub fn browser(&self) -> &MemoryBrowser {
        &self.browser
    }
}
