use crate::database::DatabaseConfig;
use crate::seed::SeedConfig;
use crate::server::config::{LoggingConfig, ServerConfig};
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "config.yaml";
const ENV_PREFIX: &str = "DASHBOARD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl Config {
    /// Defaults, then `config.yaml` if present, then `DASHBOARD_*` variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut builder =
            ConfigBuilder::builder().add_source(config::Config::try_from(&Config::default())?);

        if path.as_ref().exists() {
            builder = builder.add_source(File::from(path.as_ref()));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        builder.build()?.try_deserialize()
    }
}
