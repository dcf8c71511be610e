//! Configuration file handling for checkcam.
//!
//! Loads configuration from `~/.config/checkcam/config.toml` or a custom
//! path. A missing file means defaults; a file that exists but does not
//! parse is an error.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::capture::types::{CaptureConstraints, FacingMode, Resolution, DEFAULT_QUALITY};

/// Configuration file structure for checkcam.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct CameraConfig {
    /// Device index the native backend should open
    #[serde(default)]
    pub device: u32,
}

#[derive(Debug, Deserialize, Default)]
pub struct CaptureConfig {
    /// JPEG quality, 0.0-1.0
    pub quality: Option<f32>,
    /// Preferred resolution, [width, height]
    pub ideal: Option<[u32; 2]>,
    /// Upper resolution bound, [width, height]
    pub max: Option<[u32; 2]>,
    /// "user" or "environment"
    pub facing: Option<String>,
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else {
            log::debug!("no config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Acquisition constraints from this config, with built-in defaults for
    /// anything unset.
    pub fn constraints(&self) -> Result<CaptureConstraints, ConfigError> {
        let defaults = CaptureConstraints::default();
        let facing = match self.capture.facing.as_deref() {
            Some(s) => s
                .parse::<FacingMode>()
                .map_err(|message| ConfigError::InvalidValue {
                    field: "capture.facing",
                    message,
                })?,
            None => defaults.facing,
        };
        Ok(CaptureConstraints {
            ideal: self
                .capture
                .ideal
                .map(|[w, h]| Resolution::new(w, h))
                .unwrap_or(defaults.ideal),
            max: self
                .capture
                .max
                .map(|[w, h]| Resolution::new(w, h))
                .unwrap_or(defaults.max),
            facing,
            audio: false,
        })
    }

    /// Configured JPEG quality, falling back to the built-in default.
    pub fn quality(&self) -> f32 {
        self.capture.quality.unwrap_or(DEFAULT_QUALITY)
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid config value for '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
            ConfigError::InvalidValue { .. } => None,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("checkcam/config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/checkcam/config.toml")
        })
}
