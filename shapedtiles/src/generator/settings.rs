//! Validated settings for one generation run.

use std::path::PathBuf;

use super::GenerationError;
use crate::coord::{CoordError, GeoBounds, ZoomRange};
use crate::encode::{ImageTileEncoder, TileFormat, DEFAULT_JPEG_QUALITY};
use crate::filter::{intersecting_tiles, TileList};
use crate::mbtiles::{TilesetMetadata, DEFAULT_DESCRIPTION, DEFAULT_NAME, MBTILES_EXTENSION};
use crate::render::{RenderOptions, Rgba, DEFAULT_DPI, DEFAULT_METATILE_SIZE, MAX_DPI, MIN_DPI};
use crate::shape::ShapePolygon;

pub const DEFAULT_MIN_ZOOM: u8 = 10;
pub const DEFAULT_MAX_ZOOM: u8 = 14;

/// Tiles written between archive commits.
pub const DEFAULT_COMMIT_INTERVAL: usize = 100;

/// Everything a [`TileGenerator`](super::TileGenerator) needs, fixed for the
/// duration of a run.
///
/// Only obtainable through [`GenerationSettingsBuilder::build`], so a value
/// of this type always has a valid zoom range, in-range options and at least
/// one tile.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    zooms: ZoomRange,
    render: RenderOptions,
    encoder: ImageTileEncoder,
    output: PathBuf,
    name: String,
    description: String,
    commit_interval: usize,
    shape: ShapePolygon,
    bounds: Option<GeoBounds>,
    tiles: TileList,
}

impl GenerationSettings {
    pub fn builder(shape: ShapePolygon, output: impl Into<PathBuf>) -> GenerationSettingsBuilder {
        GenerationSettingsBuilder::new(shape, output)
    }

    pub fn zooms(&self) -> ZoomRange {
        self.zooms
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render
    }

    pub fn format(&self) -> TileFormat {
        self.render.format()
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.encoder.quality()
    }

    /// Tile encoder for the configured format and quality.
    pub fn encoder(&self) -> &ImageTileEncoder {
        &self.encoder
    }

    /// Archive path, always ending in `.mbtiles`.
    pub fn output(&self) -> &std::path::Path {
        &self.output
    }

    pub fn commit_interval(&self) -> usize {
        self.commit_interval
    }

    /// The polygon in Web Mercator.
    pub fn shape(&self) -> &ShapePolygon {
        &self.shape
    }

    /// Polygon bounds in degrees.
    pub fn bounds(&self) -> Option<GeoBounds> {
        self.bounds
    }

    pub fn tiles(&self) -> &TileList {
        &self.tiles
    }

    pub fn total_tiles(&self) -> usize {
        self.tiles.len()
    }

    /// Metadata written to the archive when it is opened.
    pub fn metadata(&self) -> TilesetMetadata {
        let metadata = TilesetMetadata::new(self.format(), self.zooms)
            .with_name(self.name.clone())
            .with_description(self.description.clone());
        match self.bounds {
            Some(bounds) => metadata.with_bounds(bounds),
            None => metadata,
        }
    }
}

/// Builder for [`GenerationSettings`].
///
/// # Example
///
/// ```
/// use shapedtiles::generator::GenerationSettings;
/// use shapedtiles::shape::{CoordFrame, ShapePolygon};
///
/// let shape = ShapePolygon::from_ring(
///     &[(5.9, 45.8), (10.5, 45.8), (10.5, 47.8), (5.9, 47.8)],
///     CoordFrame::Geographic,
/// )
/// .unwrap();
///
/// let settings = GenerationSettings::builder(shape, "switzerland")
///     .zoom(6, 8)
///     .metatile_size(2)
///     .build()
///     .unwrap();
///
/// assert!(settings.output().ends_with("switzerland.mbtiles"));
/// assert!(settings.total_tiles() > 0);
/// ```
#[derive(Debug, Clone)]
pub struct GenerationSettingsBuilder {
    shape: ShapePolygon,
    output: PathBuf,
    min_zoom: u8,
    max_zoom: u8,
    format: TileFormat,
    background: Option<Rgba>,
    dpi: u32,
    antialias: bool,
    jpeg_quality: u8,
    metatile_size: u32,
    name: String,
    description: String,
    commit_interval: usize,
}

impl GenerationSettingsBuilder {
    pub fn new(shape: ShapePolygon, output: impl Into<PathBuf>) -> Self {
        Self {
            shape,
            output: output.into(),
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            format: TileFormat::Png,
            background: None,
            dpi: DEFAULT_DPI,
            antialias: true,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            metatile_size: DEFAULT_METATILE_SIZE,
            name: DEFAULT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            commit_interval: DEFAULT_COMMIT_INTERVAL,
        }
    }

    pub fn zoom(mut self, min: u8, max: u8) -> Self {
        self.min_zoom = min;
        self.max_zoom = max;
        self
    }

    pub fn format(mut self, format: TileFormat) -> Self {
        self.format = format;
        self
    }

    pub fn background(mut self, background: Option<Rgba>) -> Self {
        self.background = background;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Meta-tile multiplier; clamped to the renderer's limits on build.
    pub fn metatile_size(mut self, metatile_size: u32) -> Self {
        self.metatile_size = metatile_size;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn commit_interval(mut self, interval: usize) -> Self {
        self.commit_interval = interval;
        self
    }

    /// Validates the settings and computes the tile list.
    ///
    /// The zoom range is checked before anything else, then option ranges,
    /// then tiles are computed. A polygon overlapping no tile is rejected
    /// with [`GenerationError::EmptyTileSet`].
    pub fn build(self) -> Result<GenerationSettings, GenerationError> {
        let zooms = ZoomRange::new(self.min_zoom, self.max_zoom).map_err(|e| match e {
            CoordError::InvalidZoomRange { min, max } => {
                GenerationError::InvalidZoomRange { min, max }
            }
            other => GenerationError::InvalidSetting {
                setting: "zoom",
                reason: other.to_string(),
            },
        })?;

        if !(MIN_DPI..=MAX_DPI).contains(&self.dpi) {
            return Err(GenerationError::InvalidSetting {
                setting: "dpi",
                reason: format!("{} is outside {}..={}", self.dpi, MIN_DPI, MAX_DPI),
            });
        }
        let encoder = ImageTileEncoder::new(self.format)
            .with_quality(self.jpeg_quality)
            .map_err(|_| GenerationError::InvalidSetting {
                setting: "jpeg_quality",
                reason: format!("{} is outside 1..=100", self.jpeg_quality),
            })?;
        if self.commit_interval == 0 {
            return Err(GenerationError::InvalidSetting {
                setting: "commit_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(GenerationError::InvalidSetting {
                setting: "name",
                reason: "must not be empty".to_string(),
            });
        }

        let shape = self.shape.to_web_mercator();
        // bounds of the area actually tiled, not of the raw input
        let bounds = shape
            .geographic_bounds()
            .map(GeoBounds::clamp_to_projection);
        let tiles = intersecting_tiles(&shape, zooms);
        if tiles.is_empty() {
            return Err(GenerationError::EmptyTileSet {
                min_zoom: zooms.min(),
                max_zoom: zooms.max(),
            });
        }

        let render = RenderOptions::new(self.format)
            .with_background(self.background)
            .with_dpi(self.dpi)
            .with_antialias(self.antialias)
            .with_metatile_size(self.metatile_size);

        Ok(GenerationSettings {
            zooms,
            render,
            encoder,
            output: with_mbtiles_extension(self.output),
            name: self.name,
            description: self.description,
            commit_interval: self.commit_interval,
            shape,
            bounds,
            tiles,
        })
    }
}

/// Appends `.mbtiles` unless the path already ends with it.
pub fn with_mbtiles_extension(path: PathBuf) -> PathBuf {
    let has_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(MBTILES_EXTENSION));
    if has_extension {
        return path;
    }
    let mut raw = path.into_os_string();
    raw.push(".");
    raw.push(MBTILES_EXTENSION);
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{tile_to_extent, TileIndex};
    use crate::encode::TileEncoder;
    use crate::shape::CoordFrame;

    fn alps() -> ShapePolygon {
        ShapePolygon::from_ring(
            &[(5.9, 45.8), (10.5, 45.8), (10.5, 47.8), (5.9, 47.8)],
            CoordFrame::Geographic,
        )
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = GenerationSettings::builder(alps(), "out.mbtiles")
            .zoom(5, 6)
            .build()
            .unwrap();

        assert_eq!(settings.zooms(), ZoomRange::new(5, 6).unwrap());
        assert_eq!(settings.format(), TileFormat::Png);
        assert_eq!(settings.jpeg_quality(), 75);
        assert_eq!(settings.commit_interval(), 100);
        assert_eq!(settings.render_options().dpi(), 96);
        assert_eq!(settings.render_options().metatile_size(), 4);
        assert!(settings.render_options().antialias());
        assert_eq!(settings.output(), std::path::Path::new("out.mbtiles"));
        assert_eq!(settings.shape().frame(), CoordFrame::WebMercator);

        let metadata = settings.metadata();
        assert_eq!(metadata.name, DEFAULT_NAME);
        let bounds = metadata.bounds.unwrap();
        assert!((bounds.lon_min - 5.9).abs() < 1e-9);
        assert!((bounds.lat_max - 47.8).abs() < 1e-9);
    }

    #[test]
    fn test_inverted_zoom_range_rejected_first() {
        // dpi is also invalid, but the zoom range must be reported
        let err = GenerationSettings::builder(alps(), "out")
            .zoom(10, 5)
            .dpi(1)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidZoomRange { min: 10, max: 5 }
        ));
    }

    #[test]
    fn test_zoom_above_maximum_rejected() {
        let err = GenerationSettings::builder(alps(), "out")
            .zoom(20, 23)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::InvalidSetting { setting: "zoom", .. }
        ));
    }

    #[test]
    fn test_option_ranges() {
        let build = |b: GenerationSettingsBuilder| b.zoom(3, 3).build().unwrap_err();

        let err = build(GenerationSettings::builder(alps(), "o").dpi(400));
        assert!(matches!(err, GenerationError::InvalidSetting { setting: "dpi", .. }));

        let err = build(GenerationSettings::builder(alps(), "o").jpeg_quality(0));
        assert!(matches!(
            err,
            GenerationError::InvalidSetting { setting: "jpeg_quality", .. }
        ));

        let err = build(GenerationSettings::builder(alps(), "o").commit_interval(0));
        assert!(matches!(
            err,
            GenerationError::InvalidSetting { setting: "commit_interval", .. }
        ));

        let err = build(GenerationSettings::builder(alps(), "o").name("  "));
        assert!(matches!(err, GenerationError::InvalidSetting { setting: "name", .. }));
    }

    #[test]
    fn test_metatile_size_is_clamped() {
        let settings = GenerationSettings::builder(alps(), "o")
            .zoom(3, 3)
            .metatile_size(64)
            .build()
            .unwrap();
        assert_eq!(settings.render_options().metatile_size(), 16);
    }

    #[test]
    fn test_polygon_off_the_plane_is_empty_tile_set() {
        // east of the projected plane
        let extent = tile_to_extent(TileIndex::new(0, 0, 0).unwrap());
        let outside = ShapePolygon::from_ring(
            &[
                (extent.max_x + 10.0, 0.0),
                (extent.max_x + 20.0, 0.0),
                (extent.max_x + 20.0, 10.0),
            ],
            CoordFrame::WebMercator,
        )
        .unwrap();

        let err = GenerationSettings::builder(outside, "o")
            .zoom(0, 2)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::EmptyTileSet { min_zoom: 0, max_zoom: 2 }
        ));
    }

    #[test]
    fn test_bounds_of_over_range_polygon_stay_on_the_plane() {
        let world = ShapePolygon::from_ring(
            &[(-200.0, -89.0), (200.0, -89.0), (200.0, 89.0), (-200.0, 89.0)],
            CoordFrame::Geographic,
        )
        .unwrap();
        let settings = GenerationSettings::builder(world, "world")
            .zoom(0, 1)
            .build()
            .unwrap();

        let bounds = settings.metadata().bounds.unwrap();
        assert!((bounds.lon_min + 180.0).abs() < 1e-9);
        assert!((bounds.lon_max - 180.0).abs() < 1e-9);
        assert!(bounds.lat_max <= 85.0512 && bounds.lat_max > 85.05);
        assert!(bounds.lat_min >= -85.0512 && bounds.lat_min < -85.05);
    }

    #[test]
    fn test_bounds_of_mercator_polygon_past_the_edge_are_clamped() {
        let extent = tile_to_extent(TileIndex::new(0, 0, 0).unwrap());
        let spill = ShapePolygon::from_ring(
            &[
                (extent.max_x - 1000.0, 0.0),
                (extent.max_x + 1_000_000.0, 0.0),
                (extent.max_x + 1_000_000.0, 1000.0),
                (extent.max_x - 1000.0, 1000.0),
            ],
            CoordFrame::WebMercator,
        )
        .unwrap();
        let settings = GenerationSettings::builder(spill, "spill")
            .zoom(0, 0)
            .build()
            .unwrap();

        let bounds = settings.metadata().bounds.unwrap();
        assert!(bounds.lon_max <= 180.0);
        assert!(bounds.lon_min < 180.0);
    }

    #[test]
    fn test_extension_appended() {
        assert_eq!(
            with_mbtiles_extension(PathBuf::from("tiles/export")),
            PathBuf::from("tiles/export.mbtiles")
        );
        assert_eq!(
            with_mbtiles_extension(PathBuf::from("export.MBTiles")),
            PathBuf::from("export.MBTiles")
        );
        assert_eq!(
            with_mbtiles_extension(PathBuf::from("export.db")),
            PathBuf::from("export.db.mbtiles")
        );
    }

    #[test]
    fn test_jpeg_settings() {
        let settings = GenerationSettings::builder(alps(), "o")
            .zoom(4, 4)
            .format(TileFormat::Jpeg)
            .jpeg_quality(40)
            .background(Some(Rgba::opaque(0, 0, 0)))
            .build()
            .unwrap();
        assert_eq!(settings.format(), TileFormat::Jpeg);
        assert_eq!(settings.jpeg_quality(), 40);
        assert_eq!(settings.encoder().quality(), 40);
        assert_eq!(settings.encoder().format(), TileFormat::Jpeg);
        assert_eq!(settings.metadata().format, TileFormat::Jpeg);
        assert_eq!(
            settings.render_options().canvas_background(),
            Rgba::opaque(0, 0, 0)
        );
    }
}
