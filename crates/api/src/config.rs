//! Server configuration
//!
//! Layered as built-in defaults, then an optional `config/temper.*` file,
//! then `TEMPER__*` environment variables (e.g. `TEMPER__DB__FILENAME`).

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Default config file stem, any format the `config` crate understands
pub const DEFAULT_CONFIG_PATH: &str = "config/temper";

/// Top-level server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port
    pub port: u16,
    pub url: UrlConfig,
    pub db: DbConfig,
    pub log: LogConfig,
    /// Responses larger than this many bytes are gzip-compressed
    pub compression_threshold: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Path prefix every route is mounted under, empty for the root
    pub base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// SQLite database file
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            url: UrlConfig {
                base: String::new(),
            },
            db: DbConfig {
                filename: "temper.db".to_string(),
            },
            log: LogConfig {
                level: "info".to_string(),
                json: false,
            },
            compression_threshold: 512,
        }
    }
}

impl ServerConfig {
    /// Load from the default file location and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load using `path` as the config file stem. A missing file is not an error.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("url.base", defaults.url.base)?
            .set_default("db.filename", defaults.db.filename)?
            .set_default("log.level", defaults.log.level)?
            .set_default("log.json", defaults.log.json)?
            .set_default("compression_threshold", i64::from(defaults.compression_threshold))?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("TEMPER").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// `host:port` string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base path with a single leading slash and no trailing slash.
    /// Empty when routes live at the root.
    pub fn base_path(&self) -> String {
        let trimmed = self.url.base.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}
