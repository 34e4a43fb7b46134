//! Configuration loading for the conversion service
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (the CLI layer reads these through clap)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! This module owns tiers 3 and 4. A missing config file is not an error;
//! the compiled defaults apply. A config file that exists but does not parse
//! fails with [`Error::Config`].

use crate::timecode::{self, DEFAULT_SAMPLE_RATE};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default HTTP bind address
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5731;

/// Default upload limit for `POST /` (16 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const CONFIG_DIR_NAME: &str = "fcpa";
const CONFIG_FILE_NAME: &str = "config.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/fcpa/config.toml";

/// Contents of `config.toml`
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// HTTP bind address
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seed session file; the embedded empty session is used when unset
    #[serde(default)]
    pub seed_path: Option<PathBuf>,

    /// Sample rate used when a request does not name one
    #[serde(default = "default_sample_rate")]
    pub default_sample_rate: u32,

    /// Largest accepted upload in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            seed_path: None,
            default_sample_rate: default_sample_rate(),
            max_upload_bytes: default_max_upload_bytes(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse and validate TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(text)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config file for this process, falling back to defaults
    ///
    /// An explicit path must exist. Without one, the platform locations
    /// are searched and defaults apply if none is present.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match locate_config_file() {
            Some(path) => Self::load(&path),
            None => {
                debug!("No config file found, using compiled defaults");
                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        timecode::validate_sample_rate(self.default_sample_rate as f64)
            .map_err(|e| Error::Config(format!("default_sample_rate: {}", e)))?;

        if self.max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be positive".to_string()));
        }

        if self.host.trim().is_empty() {
            warn!("Empty host in config, using {}", DEFAULT_HOST);
        }
        Ok(())
    }

    /// Bind address with the empty-host fallback applied
    pub fn bind_host(&self) -> &str {
        if self.host.trim().is_empty() {
            DEFAULT_HOST
        } else {
            &self.host
        }
    }
}

/// First existing config file among the platform locations
///
/// Linux checks `~/.config/fcpa/config.toml`, then `/etc/fcpa/config.toml`.
/// Other platforms check only the user config directory.
pub fn locate_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from(SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.default_sample_rate, 48_000);
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.logging.level, "info");
        assert!(config.seed_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = TomlConfig::from_toml_str("port = 9000\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_rejects_bad_sample_rate() {
        let err = TomlConfig::from_toml_str("default_sample_rate = 22050\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_zero_upload_limit() {
        assert!(TomlConfig::from_toml_str("max_upload_bytes = 0\n").is_err());
    }

    #[test]
    fn test_empty_host_falls_back() {
        let config = TomlConfig::from_toml_str("host = \"\"\n").unwrap();
        assert_eq!(config.bind_host(), DEFAULT_HOST);
    }
}
