//! ConfigLoader facade over the configuration sources.

use super::sources::{environment, file};
use super::CheckConfig;
use config::{Config, ConfigError};
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    /// Precedence: struct defaults (lowest) -> config file -> environment (highest).
    pub fn load(path: Option<&Path>) -> Result<CheckConfig, ConfigError> {
        let builder = Config::builder();
        let builder = match path {
            Some(path) => file::add_to_builder(builder, path)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Create default configuration.
    pub fn default() -> CheckConfig {
        CheckConfig::default()
    }
}
