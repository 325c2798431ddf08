//! Configuration loading for the API binary
//!
//! Values come from the environment first (after `.env` is loaded), then an
//! optional TOML file overrides any key it sets. The merged result is
//! validated before anything is built from it.

use std::str::FromStr;

use config::{Config as Layers, File, FileFormat};
use dl_shared::{AppConfig, ConfigError};
use thiserror::Error;

/// Environment variable naming the TOML overlay
pub const CONFIG_FILE_ENV: &str = "AUTH_CONFIG_FILE";

pub const DEFAULT_CONFIG_FILE: &str = "config/auth.toml";

/// Environment variable selecting the storage backend
pub const STORAGE_ENV: &str = "AUTH_STORAGE";

/// Where users and pending codes live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// MySQL credential store and Redis code store
    MySql,
    /// Process-local maps. Data is lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::MySql),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ConfigError),

    #[error("Unknown storage backend '{0}', expected 'mysql' or 'memory'")]
    UnknownStorage(String),
}

/// Everything `main` needs to wire the service
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub storage: StorageBackend,
}

impl Config {
    /// Load from the environment and the file named by `AUTH_CONFIG_FILE`
    pub fn load() -> Result<Self, ConfigLoadError> {
        let path = std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Load from the environment with `path` as the overlay. A missing file
    /// is not an error.
    pub fn load_from(path: &str) -> Result<Self, ConfigLoadError> {
        let app = overlay(&AppConfig::from_env(), path)?;
        app.validate()?;

        let storage = match std::env::var(STORAGE_ENV) {
            Ok(value) => value.parse().map_err(ConfigLoadError::UnknownStorage)?,
            Err(_) => StorageBackend::MySql,
        };

        Ok(Self { app, storage })
    }
}

fn overlay(base: &AppConfig, path: &str) -> Result<AppConfig, config::ConfigError> {
    Layers::builder()
        .add_source(Layers::try_from(base)?)
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .build()?
        .try_deserialize()
}
