use crate::errors::{ConfigError, ConfigResult};
use crate::pokedex::DatasetSource;
use crate::query::DEFAULT_LIMIT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Runtime settings, read from a RON file. Every field has a default, so an
/// empty `()` document is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PokedexConfig {
    /// JSON dataset to serve instead of the embedded one
    pub dataset: Option<PathBuf>,
    pub server: ServerConfig,
    /// Page size when a listing request gives no limit
    pub default_limit: usize,
}

impl Default for PokedexConfig {
    fn default() -> Self {
        PokedexConfig {
            dataset: None,
            server: ServerConfig::default(),
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl PokedexConfig {
    /// Load a config from its RON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&content).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The file config when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => {
                let config = Self::load(path)?;
                tracing::info!("Loaded config from {}", path.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn dataset_source(&self) -> DatasetSource {
        DatasetSource::from_path(self.dataset.clone())
    }
}
