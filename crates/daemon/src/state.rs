use std::time::Duration;
use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use common::prelude::CacheConfig;
use common::token::generate_alphanumeric;

pub const APP_NAME: &str = "docstore";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";

pub const ADMIN_TOKEN_LEN: usize = 32;
pub const DEFAULT_API_PORT: u16 = 5080;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Token required by the registration endpoint
    pub admin_token: String,
    /// Lifetime of every lookup cache entry, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Upper bound on entries held by each lookup cache
    #[serde(default = "default_cache_max_capacity")]
    pub cache_max_capacity: u64,
    /// Evict cached entries when a write makes them stale
    #[serde(default = "default_invalidate_cache_on_write")]
    pub invalidate_cache_on_write: bool,
}

fn default_api_port() -> u16 {
    DEFAULT_API_PORT
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_max_capacity() -> u64 {
    10_000
}

fn default_invalidate_cache_on_write() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            admin_token: generate_alphanumeric(ADMIN_TOKEN_LEN),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_max_capacity: default_cache_max_capacity(),
            invalidate_cache_on_write: default_invalidate_cache_on_write(),
        }
    }
}

impl AppConfig {
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: Duration::from_secs(self.cache_ttl_secs),
            max_capacity: self.cache_max_capacity,
            invalidate_on_write: self.invalidate_cache_on_write,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the docstore directory (~/.docstore)
    pub docstore_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the docstore directory path (custom or default ~/.docstore)
    pub fn docstore_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new docstore state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let docstore_dir = Self::docstore_dir(custom_path)?;

        if docstore_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&docstore_dir)?;

        let config = config.unwrap_or_default();
        let config_path = docstore_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // Create empty database (just touch the file, migrations run when the daemon starts)
        let db_path = docstore_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            docstore_dir,
            db_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the docstore directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let docstore_dir = Self::docstore_dir(custom_path)?;

        if !docstore_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = docstore_dir.join(DB_FILE_NAME);
        let config_path = docstore_dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            docstore_dir,
            db_path,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("docstore directory not initialized. Run 'docstore init' first")]
    NotInitialized,

    #[error("docstore directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("docstore");

        let created = AppState::init(Some(root.clone()), None).unwrap();
        assert!(created.db_path.exists());
        assert_eq!(created.config.admin_token.len(), ADMIN_TOKEN_LEN);

        let loaded = AppState::load(Some(root)).unwrap();
        assert_eq!(loaded.config, created.config);
    }

    #[test]
    fn test_init_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("docstore");

        AppState::init(Some(root.clone()), None).unwrap();
        assert!(matches!(
            AppState::init(Some(root), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppState::load(Some(dir.path().join("absent")));
        assert!(matches!(result, Err(StateError::NotInitialized)));
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: AppConfig = toml::from_str("admin_token = \"secret\"").unwrap();
        assert_eq!(config.api_port, 5080);
        assert_eq!(config.cache_ttl_secs, 300);
        assert!(config.invalidate_cache_on_write);

        let cache = config.cache_config();
        assert_eq!(cache.ttl, Duration::from_secs(300));
        assert_eq!(cache.max_capacity, 10_000);
    }
}
