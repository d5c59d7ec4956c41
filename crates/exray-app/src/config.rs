//! Application configuration loaded from a JSON file.

use exray_core::{HandlerConfig, InvalidConfig, SerializableColor};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "EXRAY_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(#[from] InvalidConfig),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Clear color around the canvas image.
    pub background_color: SerializableColor,
    /// Target frames per second. Zero redraws as fast as presentation allows.
    pub frame_rate: u32,
    pub handler: HandlerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Exray".to_string(),
            width: 1280,
            height: 800,
            background_color: SerializableColor::new(245, 245, 245, 255),
            frame_rate: 60,
            handler: HandlerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load a configuration file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.handler.validate()?;
        Ok(config)
    }

    /// Load from the file named by [`CONFIG_ENV`], falling back to defaults.
    pub fn from_env() -> Self {
        let Ok(path) = std::env::var(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {path}");
                config
            }
            Err(e) => {
                log::warn!("{e} ({path}), using defaults");
                Self::default()
            }
        }
    }
}
