use std::path::PathBuf;

use common::prelude::CacheConfig;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,
    /// Token a caller must present to register new users
    pub admin_token: String,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // lookup caches
    pub cache: CacheConfig,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Connection url for the configured store
    pub fn database_url(&self) -> Result<url::Url, url::ParseError> {
        match &self.sqlite_path {
            Some(path) => url::Url::parse(&format!("sqlite://{}", path.display())),
            None => url::Url::parse("sqlite::memory:"),
        }
    }
}
