// src/config.rs v3
//! User settings stored as a JSON file

use crate::error::{ConverterError, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub language: String,
    /// Keep already loaded waypoints when another file is imported.
    pub append_waypoints: bool,
    /// Replace same-named waypoints on import and existing files on export.
    pub overwrite_existing: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            append_waypoints: true,
            overwrite_existing: false,
        }
    }
}

impl ConverterConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Like [`load`](Self::load), but a missing `HOME` or a broken file only
    /// logs a warning and yields the defaults.
    pub fn load_or_default() -> Self {
        match Self::default_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                warn!("{}, using default settings", e);
                Self::default()
            }
        }
    }

    pub fn load_or_default_from(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            warn!("ignoring settings in {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::default_path()?)
    }

    /// Load from `path`, falling back to defaults when the file is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("settings file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConverterError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            ConverterError::Config(format!("Failed to parse config file: {}", e))
        })?;

        debug!("loaded settings from {}", path.display());
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConverterError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(path, contents).map_err(|e| {
            ConverterError::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// `$HOME/.config/waypoint-converter/config.json`
    pub fn default_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| ConverterError::Config("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home)
            .join(".config")
            .join("waypoint-converter")
            .join("config.json"))
    }

    pub fn update_language(&mut self, language: &str) {
        self.language = language.to_string();
    }

    pub fn update_append(&mut self, append: bool) {
        self.append_waypoints = append;
    }

    pub fn update_overwrite(&mut self, overwrite: bool) {
        self.overwrite_existing = overwrite;
    }
}
