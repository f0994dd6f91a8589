//! Persistent configuration for shapedtiles.
//!
//! Settings live in `~/.shapedtiles/config.ini`, one INI section per
//! concern:
//!
//! - `[zoom]` default zoom range
//! - `[render]` DPI, tile format, meta-tile size, background
//! - `[archive]` MBTiles name, description and commit batching
//! - `[logging]` log file location
//!
//! A missing file means defaults. Values on the command line take
//! precedence over the file; [`ConfigFile::apply_to`] seeds a
//! [`GenerationSettingsBuilder`](crate::generator::GenerationSettingsBuilder)
//! so the CLI can layer its overrides on top.
//!
//! # Example
//!
//! ```
//! use shapedtiles::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.zoom.min, 10);
//! assert_eq!(config.archive.commit_interval, 100);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ArchiveSettings, ConfigFile, LoggingSettings, RenderSettings, ZoomSettings};
