use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::clients::jikan::{JIKAN_API, RECOMMENDATIONS_LIMIT, SEARCH_LIMIT, TRENDING_LIMIT};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub catalog: CatalogConfig,

    pub session: SessionConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding the persisted watchlist, preferences and session.
    pub data_path: String,

    pub storage: StorageBackend,

    pub log_level: String,

    pub log_format: LogFormat,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            storage: StorageBackend::File,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,

    /// Request timeout in seconds (default: 15)
    pub request_timeout_seconds: u64,

    pub trending_limit: u32,

    pub search_limit: u32,

    pub recommendations_limit: usize,

    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: JIKAN_API.to_string(),
            request_timeout_seconds: 15,
            trending_limit: TRENDING_LIMIT,
            search_limit: SEARCH_LIMIT,
            recommendations_limit: RECOMMENDATIONS_LIMIT,
            user_agent: concat!("anidex/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl CatalogConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Artificial round-trip delay of the demo login, in milliseconds.
    pub simulated_delay_ms: u64,

    /// When set, only addresses at this domain may sign in (e.g. "gmail.com").
    pub allowed_email_domain: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            simulated_delay_ms: 1000,
            allowed_email_domain: None,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub const fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }
}

const APP_DIR: &str = "anidex";
const CONFIG_FILE: &str = "config.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ANIDEX_CONFIG";

fn default_data_path() -> String {
    dirs::data_dir().map_or_else(
        || "data".to_string(),
        |dir| dir.join(APP_DIR).display().to_string(),
    )
}

impl Config {
    /// Reads `$ANIDEX_CONFIG` if set, else the first config file found on the
    /// search path, else the defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
            info!(path = %path.display(), "Loading config from {CONFIG_ENV}");
            return Self::load_from_path(&path);
        }

        match Self::search_paths().into_iter().find(|p| p.is_file()) {
            Some(path) => {
                info!(path = %path.display(), "Loading config");
                Self::load_from_path(&path)
            }
            None => {
                info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Invalid config in {}", path.display()))
    }

    /// Writes pretty TOML, creating missing parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    // A file in the working directory shadows the per-user one.
    fn search_paths() -> Vec<PathBuf> {
        std::iter::once(PathBuf::from(CONFIG_FILE))
            .chain(Self::user_config_path())
            .collect()
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Where `anidex init` writes.
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(Self::user_config_path)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    /// Returns `false` and leaves the file alone when `path` already exists.
    pub fn create_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }

        Self::default().save_to_path(path)?;
        info!(path = %path.display(), "Created default config");
        Ok(true)
    }

    pub fn validate(&self) -> Result<()> {
        if self.catalog.base_url.trim().is_empty() {
            anyhow::bail!("Catalog base URL cannot be empty");
        }

        url::Url::parse(&self.catalog.base_url)
            .with_context(|| format!("Invalid catalog base URL: {}", self.catalog.base_url))?;

        if self.catalog.request_timeout_seconds == 0 {
            anyhow::bail!("Catalog request timeout must be > 0");
        }

        if self.catalog.trending_limit == 0
            || self.catalog.search_limit == 0
            || self.catalog.recommendations_limit == 0
        {
            anyhow::bail!("Catalog page sizes must be > 0");
        }

        if self.general.storage == StorageBackend::File && self.general.data_path.is_empty() {
            anyhow::bail!("Data path cannot be empty when using file storage");
        }

        Ok(())
    }
}
