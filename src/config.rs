//! Runtime configuration.
//!
//! [`CatalogConfig::load`] reads an optional JSON file named by `CATALOG_SYNC_CONFIG`,
//! then applies `CATALOG_SYNC_*` environment overrides on top. Every field has a
//! default, so an empty file (or no file) is valid apart from the manifest URL.

use crate::model::CartKeyPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_PATH_ENV: &str = "CATALOG_SYNC_CONFIG";
const ENV_PREFIX: &str = "CATALOG_SYNC_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

/// A writable copy of the manifest on a source-hosting contents API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestLocation {
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub branch: String,
    pub token: String,
}

impl Default for ManifestLocation {
    fn default() -> Self {
        Self {
            api_base: "https://api.github.com".to_string(),
            owner: String::new(),
            repo: String::new(),
            path: String::new(),
            branch: "main".to_string(),
            token: String::new(),
        }
    }
}

impl ManifestLocation {
    pub fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.path.trim_start_matches('/')
        )
    }

    /// Short name used in logs and reports: `owner/repo:path@branch`.
    pub fn label(&self) -> String {
        format!("{}/{}:{}@{}", self.owner, self.repo, self.path, self.branch)
    }
}

impl fmt::Debug for ManifestLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestLocation")
            .field("api_base", &self.api_base)
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("path", &self.path)
            .field("branch", &self.branch)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Where the read-only manifest is fetched from.
    pub manifest_url: String,
    /// Root of the image cache.
    pub asset_root: PathBuf,
    /// Directory holding the persisted state blob.
    pub state_dir: PathBuf,
    pub storage_key: String,
    pub request_timeout_ms: u64,
    /// How long progress stays at 100 after a successful sync.
    pub progress_reset_delay_ms: u64,
    pub cart_key_policy: CartKeyPolicy,
    pub event_capacity: usize,
    pub mailbox_size: usize,
    pub manifest_locations: Vec<ManifestLocation>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            manifest_url: String::new(),
            asset_root: PathBuf::from("catalog-images"),
            state_dir: PathBuf::from("catalog-state"),
            storage_key: "sbe-storage".to_string(),
            request_timeout_ms: 30_000,
            progress_reset_delay_ms: 2_000,
            cart_key_policy: CartKeyPolicy::GroupScoped,
            event_capacity: 256,
            mailbox_size: 32,
            manifest_locations: Vec::new(),
        }
    }
}

impl CatalogConfig {
    /// File named by `CATALOG_SYNC_CONFIG` (if set), then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Applies `CATALOG_SYNC_<FIELD>` overrides; `lookup` returns the variable's value.
    ///
    /// Manifest locations are not overridable individually, only as a whole via
    /// `CATALOG_SYNC_MANIFEST_LOCATIONS` (a JSON array).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| (key, value))
        };

        if let Some((_, v)) = var("MANIFEST_URL") {
            self.manifest_url = v;
        }
        if let Some((_, v)) = var("ASSET_ROOT") {
            self.asset_root = PathBuf::from(v);
        }
        if let Some((_, v)) = var("STATE_DIR") {
            self.state_dir = PathBuf::from(v);
        }
        if let Some((_, v)) = var("STORAGE_KEY") {
            self.storage_key = v;
        }
        if let Some((k, v)) = var("REQUEST_TIMEOUT_MS") {
            self.request_timeout_ms = parse(k, v)?;
        }
        if let Some((k, v)) = var("PROGRESS_RESET_DELAY_MS") {
            self.progress_reset_delay_ms = parse(k, v)?;
        }
        if let Some((k, v)) = var("CART_KEY_POLICY") {
            self.cart_key_policy = match v.trim().to_lowercase().as_str() {
                "group_scoped" | "group" => CartKeyPolicy::GroupScoped,
                "product_name" | "product" => CartKeyPolicy::ProductName,
                _ => return Err(ConfigError::InvalidValue { key: k, value: v }),
            };
        }
        if let Some((k, v)) = var("EVENT_CAPACITY") {
            self.event_capacity = parse(k, v)?;
        }
        if let Some((k, v)) = var("MAILBOX_SIZE") {
            self.mailbox_size = parse(k, v)?;
        }
        if let Some((k, v)) = var("MANIFEST_LOCATIONS") {
            self.manifest_locations = serde_json::from_str(&v)
                .map_err(|_| ConfigError::InvalidValue { key: k, value: v })?;
        }

        debug!(config = ?self, "Config after environment overrides");
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.manifest_url.trim().is_empty() {
            return Err(ConfigError::Missing("manifest_url"));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Missing("storage_key"));
        }
        if self.mailbox_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "mailbox_size".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn progress_reset_delay(&self) -> Duration {
        Duration::from_millis(self.progress_reset_delay_ms)
    }
}

fn parse<T: std::str::FromStr>(key: String, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
