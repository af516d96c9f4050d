//! Configuration loading and management
//!
//! Layering, lowest to highest priority:
//! 1. built-in defaults
//! 2. an optional YAML file (path in `INVOICE_LEDGER_CONFIG`)
//! 3. variables from a `.env` file in the working directory
//! 4. process environment variables (`HOST`, `PORT`, `STORE_BACKEND`,
//!    `MONGO_URI`, `MONGO_DATABASE`)
//!
//! The `.env` file is read into a map, never copied into the process
//! environment, so a variable set in both places keeps its real value.
//!
//! A missing connection string is not a configuration error: the server still
//! starts, and store-dependent calls fail until one is provided.

use crate::core::error::ConfigError;
use crate::core::{DEFAULT_SEQUENCE_START, INVOICE_NUMBER_SEQUENCE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Environment variable naming the optional YAML config file
pub const CONFIG_PATH_ENV: &str = "INVOICE_LEDGER_CONFIG";

/// Dotenv file consulted by [`AppConfig::load`], relative to the working directory
pub const DOTENV_FILE: &str = ".env";

/// Which storage backend to run against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongodb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::Mongodb),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::InvalidValue {
                field: "store.backend".to_string(),
                value: s.to_string(),
                message: "expected 'mongodb' or 'memory'".to_string(),
            }),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Mongodb => f.write_str("mongodb"),
            StoreBackend::Memory => f.write_str("memory"),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// MongoDB connection string
    pub mongo_uri: Option<String>,

    /// Overrides the database named in the connection string
    pub database: Option<String>,

    /// Sequence used by the next-invoice-number endpoint
    pub sequence_name: String,

    /// Value a counter holds before its first increment
    pub initial_value: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            mongo_uri: None,
            database: None,
            sequence_name: INVOICE_NUMBER_SEQUENCE.to_string(),
            initial_value: DEFAULT_SEQUENCE_START,
        }
    }
}

/// Complete process configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load from the process environment, falling back to `.env`
    pub fn load() -> Result<Self, ConfigError> {
        let dotenv = read_dotenv(Path::new(DOTENV_FILE))?;

        Self::load_with(|key| std::env::var(key).ok().or_else(|| dotenv.get(key).cloned()))
    }

    /// Load defaults, then the YAML file named by `INVOICE_LEDGER_CONFIG` if
    /// `lookup` yields one, then the variables `lookup` yields
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match lookup(CONFIG_PATH_ENV) {
            Some(path) if !path.trim().is_empty() => Self::from_yaml_file(&path)?,
            _ => Self::default(),
        };

        base.with_env(lookup)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// Blank values are treated as unset.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port.trim().parse().map_err(|e| ConfigError::InvalidValue {
                field: "server.port".to_string(),
                value: port.clone(),
                message: format!("{}", e),
            })?;
        }
        if let Some(backend) = get("STORE_BACKEND") {
            self.store.backend = backend.parse()?;
        }
        if let Some(uri) = get("MONGO_URI") {
            self.store.mongo_uri = Some(uri);
        }
        if let Some(database) = get("MONGO_DATABASE") {
            self.store.database = Some(database);
        }

        Ok(self)
    }
}

/// Read `KEY=value` pairs from a dotenv file
///
/// A missing file yields an empty map.
pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    if !path.is_file() {
        return Ok(HashMap::new());
    }

    let file = path.display().to_string();
    let parse_error = |e: dotenvy::Error| ConfigError::ParseError {
        file: Some(file.clone()),
        message: e.to_string(),
    };

    dotenvy::from_path_iter(path)
        .map_err(parse_error)?
        .map(|item| item.map_err(parse_error))
        .collect()
}
