//! Configuration file handling for ~/.shapedtiles/config.ini.
//!
//! Settings structs live in [`super::settings`], defaults in
//! [`super::defaults`], parsing in [`super::parser`], and serialization in
//! [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;
use crate::generator::GenerationSettingsBuilder;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.shapedtiles/config.ini).
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save configuration to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// Seeds a settings builder with these values.
    ///
    /// Command-line overrides are applied to the returned builder
    /// afterwards, so they win over the file.
    pub fn apply_to(&self, builder: GenerationSettingsBuilder) -> GenerationSettingsBuilder {
        builder
            .zoom(self.zoom.min, self.zoom.max)
            .dpi(self.render.dpi)
            .format(self.render.format)
            .jpeg_quality(self.render.jpeg_quality)
            .metatile_size(self.render.metatile_size)
            .antialias(self.render.antialias)
            .background(self.render.background)
            .name(self.archive.name.clone())
            .description(self.archive.description.clone())
            .commit_interval(self.archive.commit_interval)
    }
}

/// Get the path to the config directory (~/.shapedtiles).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".shapedtiles")
}

/// Get the path to the config file (~/.shapedtiles/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
