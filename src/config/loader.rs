//! Configuration file loader.

use super::error::{ConfigError, ConfigResult};
use super::types::GatewayConfig;
use std::path::Path;
use tracing::info;

/// Loader for gateway configuration files.
#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Create a new configuration loader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(&self, path: P) -> ConfigResult<GatewayConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = self.load_str(&content)?;
        info!(path = %path.display(), "gateway configuration loaded");
        Ok(config)
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn load_str(&self, content: &str) -> ConfigResult<GatewayConfig> {
        let config: GatewayConfig = toml::from_str(content)?;
        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }

    /// Load configuration from a file, or return defaults if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for an existing-but-invalid file.
    pub fn load_or_default<P: AsRef<Path>>(&self, path: P) -> ConfigResult<GatewayConfig> {
        match self.load(&path) {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => {
                info!(
                    path = %path.as_ref().display(),
                    "no configuration file, using defaults"
                );
                Ok(GatewayConfig::default())
            },
            Err(e) => Err(e),
        }
    }
}
