//! Extension instance
//!
//! Owns the background-side state: storage, the whitelist, the
//! interceptor and the management surface, all sharing one browser
//! adapter.

use std::sync::Arc;

use always_private_interceptor::{
    BlockingResponse, BrowserApi, Decision, Interceptor, NavigationEvent,
};
use always_private_storage::{Database, KeyValueStore};
use always_private_whitelist::WhitelistStore;

use crate::config::Config;
use crate::management::Management;
use crate::Result;

pub struct Extension {
    /// Configuration
    config: Config,
    /// Whitelist shared by the interceptor and the management surface
    whitelist: WhitelistStore,
    /// Navigation interceptor
    interceptor: Interceptor,
    /// Popup operations
    management: Management,
}

impl Extension {
    /// Open the settings database named in `config` and wire everything to `api`
    pub fn new(config: Config, api: Arc<dyn BrowserApi>) -> Result<Self> {
        let db = Database::open(&config.database_path)?;
        let extension = Self::with_store(config, Arc::new(db), api);

        tracing::info!(
            database = %extension.config.database_path.display(),
            debounce_ms = extension.config.debounce_ms,
            "Extension initialized"
        );

        Ok(extension)
    }

    /// Wire the extension to an already opened store
    pub fn with_store(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        api: Arc<dyn BrowserApi>,
    ) -> Self {
        let whitelist = WhitelistStore::new(store);
        let interceptor = Interceptor::new(
            Arc::clone(&api),
            whitelist.clone(),
            config.interceptor_config(),
        );
        let management = Management::new(
            whitelist.clone(),
            api,
            config.popup_page.clone(),
            config.export_file_name.clone(),
        );

        Self {
            config,
            whitelist,
            interceptor,
            management,
        }
    }

    /// Blocking request listener entry point
    pub fn on_before_request(&self, event: &NavigationEvent) -> BlockingResponse {
        self.handle_navigation(event).response()
    }

    /// Same as [`Extension::on_before_request`] but keeps the full decision
    pub fn handle_navigation(&self, event: &NavigationEvent) -> Decision {
        self.interceptor.handle(event)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn whitelist(&self) -> &WhitelistStore {
        &self.whitelist
    }

    pub fn management(&self) -> &Management {
        &self.management
    }
}
