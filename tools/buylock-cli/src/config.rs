//! CLI configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding `storage.data_dir`.
pub const ENV_DATA_DIR: &str = "BUYLOCK_DATA_DIR";
/// Environment variable overriding `rates.endpoint`.
pub const ENV_RATES_ENDPOINT: &str = "BUYLOCK_RATES_ENDPOINT";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Durable storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Exchange-rate configuration.
    #[serde(default)]
    pub rates: RatesConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Apply `BUYLOCK_*` environment overrides.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var_os(ENV_DATA_DIR).map(PathBuf::from),
            std::env::var(ENV_RATES_ENDPOINT).ok(),
        )
    }

    fn with_overrides(mut self, data_dir: Option<PathBuf>, endpoint: Option<String>) -> Self {
        if let Some(dir) = data_dir {
            self.storage.data_dir = dir;
        }
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.rates.endpoint = endpoint;
        }
        self
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Where client state is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for the file store, relative to the working directory
    /// unless absolute.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".buylock")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Exchange-rate endpoint and cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesConfig {
    /// Exchange-rates endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// How long cached rates are served, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Request timeout, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://localhost:5000/api/exchange-rates".to_string()
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_timeout_secs() -> u64 {
    10
}

impl RatesConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            ttl_secs: default_ttl_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Generate a default buylock.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# BuyLock client configuration

[storage]
data_dir = "{data_dir}"

[rates]
endpoint = "{endpoint}"
# Cached rates younger than this are used without a request.
ttl_secs = {ttl}
timeout_secs = {timeout}
"#,
        data_dir = default_data_dir().display(),
        endpoint = default_endpoint(),
        ttl = default_ttl_secs(),
        timeout = default_timeout_secs(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from(".buylock"));
        assert_eq!(config.rates.ttl(), Duration::from_secs(3600));
        assert_eq!(config.rates.endpoint, default_endpoint());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: CliConfig = toml::from_str(
            r#"
            [rates]
            endpoint = "https://buylock.example/api/exchange-rates"
            "#,
        )
        .unwrap();

        assert_eq!(config.rates.timeout_secs, 10);
        assert_eq!(config.storage.data_dir, PathBuf::from(".buylock"));
    }

    #[test]
    fn test_overrides_replace_values() {
        let config = CliConfig::default().with_overrides(
            Some(PathBuf::from("/var/lib/buylock")),
            Some("http://rates.internal/api".to_string()),
        );
        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/buylock"));
        assert_eq!(config.rates.endpoint, "http://rates.internal/api");

        let untouched = CliConfig::default().with_overrides(None, Some("  ".to_string()));
        assert_eq!(untouched.rates.endpoint, default_endpoint());
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buylock.json");

        let mut config = CliConfig::default();
        config.rates.ttl_secs = 60;
        config.save(&path).unwrap();

        let loaded = CliConfig::load(&path).unwrap();
        assert_eq!(loaded.rates.ttl_secs, 60);
    }
}
