use anyhow::{Context, Result};
use carbon_signal_api::api::{DEFAULT_BASE_URL, DEFAULT_ZONES_URL};
use carbon_signal_api::{FileStore, SignalClient};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub zones_url: String,
    /// Look up a friendly zone name after a successful reading.
    pub resolve_zone_names: bool,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
    pub encrypt: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            zones_url: DEFAULT_ZONES_URL.to_string(),
            resolve_zone_names: true,
            connect_timeout_seconds: 10,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            encrypt: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// `Ok(None)` when there is no file; a file that fails to parse is an error.
    pub fn load_if_present(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match self.storage.data_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => FileStore::default_dir(),
        }
    }

    pub fn signal_client(&self) -> SignalClient {
        SignalClient::new(
            self.api.base_url.clone(),
            self.api.zones_url.clone(),
            Duration::from_secs(self.api.connect_timeout_seconds),
        )
    }
}
