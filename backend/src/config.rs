//! Configuration management for the Sugarcane Yield Predictor
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with YIELD_ prefix
//!
//! The taluka weather table is not part of these settings. It is read from
//! the separate secrets file named by `secrets.path`.

use std::path::PathBuf;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Model artifact locations
    pub artifacts: ArtifactsConfig,

    /// Secrets file holding the taluka weather table
    pub secrets: SecretsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArtifactsConfig {
    /// Directory holding the model files; `models/` next to the executable when unset
    pub model_dir: Option<PathBuf>,

    /// Serialized model file name
    pub model_file: String,

    /// Ordered column list file name
    pub columns_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretsConfig {
    /// Path to the TOML secrets file
    pub path: PathBuf,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("YIELD_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8501)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("artifacts.model_file", crate::artifacts::MODEL_FILE)?
            .set_default("artifacts.columns_file", crate::artifacts::COLUMNS_FILE)?
            .set_default("secrets.path", "config/secrets.toml")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (YIELD_ prefix)
            .add_source(
                Environment::with_prefix("YIELD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8501,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            model_file: crate::artifacts::MODEL_FILE.to_string(),
            columns_file: crate::artifacts::COLUMNS_FILE.to_string(),
        }
    }
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config/secrets.toml"),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            artifacts: ArtifactsConfig::default(),
            secrets: SecretsConfig::default(),
        }
    }
}
