use std::env;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{LoadError, LoadResult};
use crate::validation::validate_model;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate]
    pub database: DatabaseConfig,
    #[validate]
    pub input: InputConfig,
    #[validate]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseConfig {
    #[validate(length(min = 1, message = "Database URL must not be empty"))]
    pub url: String,
    #[validate(range(min = 1, message = "At least one connection is required"))]
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
}

/// Where the three input files live and how they are named
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InputConfig {
    #[validate(length(min = 1))]
    pub data_dir: String,
    /// Shipment log, one row per shipment line
    #[validate(length(min = 1))]
    pub direct_file: String,
    /// Product lines, one row per unit
    #[validate(length(min = 1))]
    pub lines_file: String,
    /// Shipment headers
    #[validate(length(min = 1))]
    pub headers_file: String,
    #[validate(length(equal = 1, message = "Delimiter must be a single character"))]
    pub delimiter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    #[validate(length(min = 1))]
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with SHIPLOAD prefix
            .add_source(Environment::with_prefix("SHIPLOAD").separator("__"));

        config.build()?.try_deserialize()
    }

    /// Load and validate in one step
    pub fn load_validated() -> LoadResult<Self> {
        let config = Self::load()?;
        validate_model(&config)?;
        Ok(config)
    }
}

impl InputConfig {
    /// Input paths in load order: direct, lines, headers
    pub fn paths_in(&self, dir: impl AsRef<Path>) -> [PathBuf; 3] {
        let dir = dir.as_ref();
        [
            dir.join(&self.direct_file),
            dir.join(&self.lines_file),
            dir.join(&self.headers_file),
        ]
    }

    pub fn delimiter_byte(&self) -> LoadResult<u8> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(LoadError::configuration(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://shipment_database.db".to_string(),
            max_connections: 1,
            connection_timeout_seconds: 30,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            direct_file: "shipping_data_0.csv".to_string(),
            lines_file: "shipping_data_1.csv".to_string(),
            headers_file: "shipping_data_2.csv".to_string(),
            delimiter: ",".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}
