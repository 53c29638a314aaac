//! Persisted CLI configuration.
//!
//! Settings live in `<config dir>/hunter/config.toml` and are overridden by
//! environment variables. The file holds an API key, so it is written with
//! owner-only permissions on Unix.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use hunter::{DEFAULT_ENHANCE_TIMEOUT, DEFAULT_MODEL};

const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_API_KEY: &str = "TOGETHER_API_KEY";
pub const ENV_MODEL: &str = "HUNTER_MODEL";
pub const ENV_TIMEOUT: &str = "HUNTER_TIMEOUT_SECS";
pub const ENV_ENHANCE: &str = "HUNTER_ENHANCE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Together.ai API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Enhancement model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Enhancement timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Run the enhancement pass when an API key is available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhance: Option<bool>,
}

impl Config {
    /// `<config dir>/hunter/config.toml`, if the platform has a config dir
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hunter").join(CONFIG_FILE_NAME))
    }

    /// Load the config file; a missing file gives the defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the config file and apply environment overrides
    pub fn load() -> Result<Self> {
        let config = match Self::config_path() {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|name| std::env::var(name).ok()))
    }

    /// Apply overrides looked up by variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.model = Some(model);
        }
        if let Some(value) = lookup(ENV_TIMEOUT) {
            match value.parse() {
                Ok(secs) => self.timeout_secs = Some(secs),
                Err(_) => tracing::warn!(%value, "ignoring invalid {ENV_TIMEOUT}"),
            }
        }
        if let Some(value) = lookup(ENV_ENHANCE) {
            match parse_flag(&value) {
                Some(enhance) => self.enhance = Some(enhance),
                None => tracing::warn!(%value, "ignoring invalid {ENV_ENHANCE}"),
            }
        }
        self
    }

    /// Write the config file, readable by the owner only
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
            restrict_permissions(parent, 0o700)?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        restrict_permissions(path, 0o600)?;

        tracing::debug!(path = %path.display(), "wrote config");
        Ok(())
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_ENHANCE_TIMEOUT)
    }

    pub fn enhance_enabled(&self) -> bool {
        self.enhance.unwrap_or(true)
    }

    /// The API key with all but its ends hidden
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_deref().map(mask_key)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.enhance_enabled());
        assert_eq!(config.masked_api_key(), None);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_path(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"abc\"\ntimeout_secs = 5\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(Config::load_from_path(&path).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hunter").join("config.toml");
        let config = Config {
            api_key: Some("tok-1234567890".to_string()),
            model: Some("some/model".to_string()),
            ..Config::default()
        };

        config.save_to_path(&path).unwrap();
        assert_eq!(Config::load_from_path(&path).unwrap(), config);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hunter").join("config.toml");
        Config::default().save_to_path(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config {
            api_key: Some("from-file".to_string()),
            enhance: Some(true),
            ..Config::default()
        }
        .with_overrides(env(&[
            (ENV_API_KEY, "from-env"),
            (ENV_MODEL, "other/model"),
            (ENV_TIMEOUT, "12"),
            (ENV_ENHANCE, "off"),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.model(), "other/model");
        assert_eq!(config.timeout(), Duration::from_secs(12));
        assert!(!config.enhance_enabled());
    }

    #[test]
    fn test_invalid_and_blank_overrides_are_ignored() {
        let config = Config {
            api_key: Some("from-file".to_string()),
            timeout_secs: Some(7),
            ..Config::default()
        }
        .with_overrides(env(&[
            (ENV_API_KEY, "  "),
            (ENV_TIMEOUT, "later"),
            (ENV_ENHANCE, "maybe"),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.timeout(), Duration::from_secs(7));
        assert!(config.enhance_enabled());
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("abcd1234efgh5678"), "abcd...5678");
        assert_eq!(mask_key("short"), "*****");
    }
}
