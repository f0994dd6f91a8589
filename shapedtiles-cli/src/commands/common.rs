//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use shapedtiles::config::ConfigFile;
use shapedtiles::coord::{ZoomRange, MAX_ZOOM};
use shapedtiles::encode::TileFormat;
use shapedtiles::shape::ShapePolygon;

use crate::error::CliError;

/// Tile image format selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum FormatArg {
    /// PNG, transparent outside the polygon unless a background is set
    Png,
    /// JPEG, smaller files, white (or --background) outside the polygon
    Jpeg,
}

impl From<FormatArg> for TileFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Png => TileFormat::Png,
            FormatArg::Jpeg => TileFormat::Jpeg,
        }
    }
}

/// Polygon input and zoom range, shared by generate, estimate and tiles.
#[derive(Debug, Args)]
pub struct AreaArgs {
    /// GeoJSON file with the polygon to cover (longitude/latitude)
    pub polygon: PathBuf,

    /// Lowest zoom level (default from config, 10)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=MAX_ZOOM as i64))]
    pub min_zoom: Option<u8>,

    /// Highest zoom level (default from config, 14)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=MAX_ZOOM as i64))]
    pub max_zoom: Option<u8>,
}

impl AreaArgs {
    /// Resolve the zoom range: CLI takes precedence, then config.
    pub fn zoom_bounds(&self, config: &ConfigFile) -> (u8, u8) {
        (
            self.min_zoom.unwrap_or(config.zoom.min),
            self.max_zoom.unwrap_or(config.zoom.max),
        )
    }

    /// Resolved and validated zoom range.
    pub fn zoom_range(&self, config: &ConfigFile) -> Result<ZoomRange, CliError> {
        let (min, max) = self.zoom_bounds(config);
        ZoomRange::new(min, max).map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn load_polygon(&self) -> Result<ShapePolygon, CliError> {
        load_polygon(&self.polygon)
    }
}

/// Read and parse a GeoJSON polygon file.
pub fn load_polygon(path: &Path) -> Result<ShapePolygon, CliError> {
    let text = std::fs::read_to_string(path).map_err(|error| CliError::FileRead {
        path: path.to_path_buf(),
        error,
    })?;
    ShapePolygon::from_geojson_str(&text).map_err(|error| CliError::Shape {
        path: path.to_path_buf(),
        error,
    })
}
