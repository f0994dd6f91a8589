//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

use crate::encode::TileFormat;
use crate::render::Rgba;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub zoom: ZoomSettings,
    pub render: RenderSettings,
    pub archive: ArchiveSettings,
    pub logging: LoggingSettings,
}

/// Default zoom range for `generate` and `estimate`.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomSettings {
    pub min: u8,
    pub max: u8,
}

/// Tile rendering and encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub dpi: u32,
    pub format: TileFormat,
    /// JPEG quality, 1-100
    pub jpeg_quality: u8,
    /// Meta-tile multiplier, 1-16
    pub metatile_size: u32,
    pub antialias: bool,
    /// Canvas colour; `None` means transparent for PNG, white for JPEG
    pub background: Option<Rgba>,
}

/// Archive metadata and write batching.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveSettings {
    pub name: String,
    pub description: String,
    /// Tiles written between commits
    pub commit_interval: usize,
}

/// Log file location.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}
