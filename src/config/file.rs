//! Configuration file management for beey.
//!
//! Settings are read from `~/.config/beey/beey.toml` when it exists and can
//! be overridden through `BEEY_*` environment variables.

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const ENV_CONFIG_PATH: &str = "BEEY_CONFIG";
pub const ENV_BASE_URI: &str = "BEEY_BASE_URI";
pub const ENV_API_KEY: &str = "BEEY_API_KEY";
pub const ENV_TIMEOUT_SECS: &str = "BEEY_TIMEOUT_SECS";

/// Connection settings for the Beey API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, including the `XAPI/v2` path
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
    /// Pre-shared key sent in the `authorization` header
    #[serde(default)]
    pub api_key: Option<String>,
    /// Overall request timeout in seconds. Uploads share it, so keep it generous.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_uri() -> String {
    "https://www.beey.io/XAPI/v2".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_uri: default_base_uri(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeeyConfig {
    #[serde(default)]
    pub api: ApiConfig,
}

impl BeeyConfig {
    /// Loads configuration from the config file and the environment.
    ///
    /// A missing config file is not an error; environment variables alone are enough.
    ///
    /// # Errors
    /// - If the config file exists but cannot be read or parsed
    /// - If an environment override is malformed
    /// - If no API key is configured anywhere
    pub fn load() -> anyhow::Result<Self> {
        let config_path = get_config_path()?;
        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::from_toml(&content)
                .with_context(|| format!("Invalid configuration in {}", config_path.display()))?
        } else {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;

        if config.api.api_key.is_none() {
            return Err(anyhow!(
                "No Beey API key configured. Set {ENV_API_KEY} or api_key under [api] in {}",
                config_path.display()
            ));
        }

        tracing::debug!("Configuration loaded for {}", config.api.base_uri);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Applies `BEEY_*` overrides. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(base_uri) = lookup(ENV_BASE_URI) {
            self.api.base_uri = base_uri;
        }
        if let Some(api_key) = lookup(ENV_API_KEY) {
            self.api.api_key = Some(api_key);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.api.timeout_secs = timeout
                .trim()
                .parse()
                .map_err(|e| anyhow!("{ENV_TIMEOUT_SECS} must be a number of seconds: {e}"))?;
        }
        Ok(())
    }
}

/// Retrieves the path to the config file, honouring `BEEY_CONFIG`.
///
/// # Errors
/// - If the home directory cannot be determined
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
        return Ok(PathBuf::from(path));
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("beey").join("beey.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = BeeyConfig::from_toml("").unwrap();
        assert_eq!(config, BeeyConfig::default());
        assert_eq!(config.api.timeout_secs, 300);
    }

    #[test]
    fn test_parse_file() {
        let config = BeeyConfig::from_toml(
            r#"
            [api]
            base_uri = "https://beey.example.com/XAPI/v2"
            api_key = "file-key"
            timeout_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_uri, "https://beey.example.com/XAPI/v2");
        assert_eq!(config.api.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.api.timeout_secs, 60);
    }

    #[test]
    fn test_malformed_file_fails() {
        assert!(BeeyConfig::from_toml("[api]\ntimeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = BeeyConfig::from_toml("[api]\napi_key = \"file-key\"").unwrap();
        config
            .apply_env(env(&[
                (ENV_API_KEY, "env-key"),
                (ENV_BASE_URI, "http://localhost:8080/XAPI/v2"),
                (ENV_TIMEOUT_SECS, "15"),
            ]))
            .unwrap();
        assert_eq!(config.api.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.api.base_uri, "http://localhost:8080/XAPI/v2");
        assert_eq!(config.api.timeout_secs, 15);
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = BeeyConfig::from_toml("[api]\napi_key = \"file-key\"").unwrap();
        config.apply_env(env(&[(ENV_API_KEY, "  ")])).unwrap();
        assert_eq!(config.api.api_key.as_deref(), Some("file-key"));
    }

    #[test]
    fn test_bad_timeout_env_fails() {
        let mut config = BeeyConfig::default();
        let err = config
            .apply_env(env(&[(ENV_TIMEOUT_SECS, "ten")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT_SECS));
    }
}
