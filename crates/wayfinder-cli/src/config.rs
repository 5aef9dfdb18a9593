//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Location API used when neither the flag, the environment nor the config
/// names one.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:3000";

/// Request timeout used when the config does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the location API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wayfinder")
            .join("config.toml")
    }

    /// Load config from the default path, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`, warning about and ignoring an unreadable file
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Resolve the API URL from the flag (or its env var), then config, then
/// the default.
pub fn resolve_service_url(arg: Option<&str>, config: &Config) -> String {
    arg.map(str::to_string)
        .or_else(|| config.service_url.clone())
        .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string())
}

/// Resolve the request timeout from config or the default.
pub fn resolve_timeout(config: &Config) -> Duration {
    Duration::from_secs(config.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_service_url_prefers_arg() {
        let config = Config {
            service_url: Some("http://config:3000".to_string()),
            timeout: None,
        };
        assert_eq!(
            resolve_service_url(Some("http://arg:3000"), &config),
            "http://arg:3000"
        );
    }

    #[test]
    fn test_resolve_service_url_falls_back_to_config() {
        let config = Config {
            service_url: Some("http://config:3000".to_string()),
            timeout: None,
        };
        assert_eq!(resolve_service_url(None, &config), "http://config:3000");
    }

    #[test]
    fn test_resolve_service_url_default() {
        assert_eq!(
            resolve_service_url(None, &Config::default()),
            DEFAULT_SERVICE_URL
        );
    }

    #[test]
    fn test_resolve_timeout() {
        assert_eq!(
            resolve_timeout(&Config::default()),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );
        let config = Config {
            service_url: None,
            timeout: Some(3),
        };
        assert_eq!(resolve_timeout(&config), Duration::from_secs(3));
    }

    #[test]
    fn test_config_path() {
        assert!(Config::path().ends_with("wayfinder/config.toml"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");
        let config = Config {
            service_url: Some("https://wayfinder.example".to_string()),
            timeout: Some(5),
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_load_missing_or_invalid_gives_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        assert_eq!(Config::load_from(&missing), Config::default());

        let invalid = temp_dir.path().join("invalid.toml");
        fs::write(&invalid, "timeout = \"soon\"").unwrap();
        assert_eq!(Config::load_from(&invalid), Config::default());
    }

    #[test]
    fn test_empty_config_serializes_empty() {
        assert!(toml::to_string_pretty(&Config::default()).unwrap().trim().is_empty());
    }
}
