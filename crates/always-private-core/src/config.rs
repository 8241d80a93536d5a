//! Extension configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use always_private_interceptor::InterceptorConfig;
use always_private_whitelist::EXPORT_FILE_NAME;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the settings database
    pub database_path: PathBuf,
    /// Debounce window for duplicate navigation events, in milliseconds
    pub debounce_ms: u64,
    /// File name offered when exporting the whitelist
    pub export_file_name: String,
    /// Management popup page, relative to the extension root
    pub popup_page: String,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("always-private.db"),
            debounce_ms: 10,
            export_file_name: EXPORT_FILE_NAME.to_string(),
            popup_page: "popup.html".to_string(),
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("AlwaysPrivate"))
            .unwrap_or_else(|| PathBuf::from(".always-private"))
    }

    /// Load from a JSON file, falling back to defaults when no path is
    /// given or the file does not exist. Missing fields take defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn interceptor_config(&self) -> InterceptorConfig {
        InterceptorConfig::with_debounce_ms(self.debounce_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Per-platform application data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/tmp/ap"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/ap/always-private.db"));
        assert_eq!(config.debounce_ms, 10);
        assert_eq!(config.export_file_name, "always-private-whitelist.json");
        assert_eq!(
            config.interceptor_config().debounce,
            Duration::from_millis(10)
        );
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(Some(dir.path().join("absent.json").as_path())).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "debounce_ms": 25 }"#).unwrap();

        let config = Config::load_or_default(Some(path.as_path())).unwrap();
        assert_eq!(config.debounce_ms, 25);
        assert_eq!(config.popup_page, "popup.html");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = Config::new(dir.path().to_path_buf());
        config.debounce_ms = 0;

        config.save(&path).unwrap();
        assert_eq!(Config::load_or_default(Some(path.as_path())).unwrap(), config);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "debounce_ms = 25").unwrap();

        assert!(matches!(
            Config::load_or_default(Some(path.as_path())),
            Err(CoreError::Config(_))
        ));
    }
}
