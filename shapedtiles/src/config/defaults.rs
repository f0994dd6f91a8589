//! Default values for all configuration settings and the
//! `ConfigFile::default()` implementation.

use super::file::config_directory;
use super::settings::*;
use crate::encode::{TileFormat, DEFAULT_JPEG_QUALITY};
use crate::generator::{DEFAULT_COMMIT_INTERVAL, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
use crate::logging::{default_log_dir, default_log_file};
use crate::mbtiles::{DEFAULT_DESCRIPTION, DEFAULT_NAME};
use crate::render::{DEFAULT_DPI, DEFAULT_METATILE_SIZE};

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            zoom: ZoomSettings {
                min: DEFAULT_MIN_ZOOM,
                max: DEFAULT_MAX_ZOOM,
            },
            render: RenderSettings {
                dpi: DEFAULT_DPI,
                format: TileFormat::Png,
                jpeg_quality: DEFAULT_JPEG_QUALITY,
                metatile_size: DEFAULT_METATILE_SIZE,
                antialias: true,
                background: None,
            },
            archive: ArchiveSettings {
                name: DEFAULT_NAME.to_string(),
                description: DEFAULT_DESCRIPTION.to_string(),
                commit_interval: DEFAULT_COMMIT_INTERVAL,
            },
            logging: LoggingSettings {
                directory: config_directory().join(default_log_dir()),
                file: default_log_file().to_string(),
            },
        }
    }
}
