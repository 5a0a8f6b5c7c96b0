//! Ownbuf Configuration
//!
//! Handles parsing and management of ownbuf.toml configuration files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::device::DEFAULT_DEVICE_CAPACITY;
use crate::ids::{DeviceId, FIRST_DEVICE_ID};

/// Name of the configuration file searched for by [`OwnbufConfig::find_and_load`]
pub const CONFIG_FILE_NAME: &str = "ownbuf.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    NotFound(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration structure matching ownbuf.toml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OwnbufConfig {
    #[serde(default)]
    pub buffer: BufferConfig,

    #[serde(default)]
    pub device: DeviceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl OwnbufConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: OwnbufConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the current directory or parents.
    pub fn load_from_cwd() -> ConfigResult<Self> {
        let cwd = std::env::current_dir().map_err(ConfigError::Io)?;
        Self::find_and_load(&cwd)
    }

    /// Find and load configuration by searching up from the given directory.
    pub fn find_and_load(start_dir: &Path) -> ConfigResult<Self> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::load(&config_path);
            }
            if !dir.pop() {
                return Ok(Self::default());
            }
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Buffer defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Capacity used when a buffer is built from a size only
    #[serde(default = "default_buffer_capacity")]
    pub default_capacity: usize,
}

fn default_buffer_capacity() -> usize {
    100
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            default_capacity: default_buffer_capacity(),
        }
    }
}

/// Device defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Buffer capacity for new devices
    #[serde(default = "default_device_capacity")]
    pub default_capacity: usize,

    /// First identifier handed out by a fresh registry
    #[serde(default = "default_first_id")]
    pub first_id: DeviceId,
}

fn default_device_capacity() -> usize {
    DEFAULT_DEVICE_CAPACITY
}

fn default_first_id() -> DeviceId {
    FIRST_DEVICE_ID
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            default_capacity: default_device_capacity(),
            first_id: default_first_id(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by RUST_LOG
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}
