//! Coordinate type definitions

use std::fmt;

/// Standard web map tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Half the width of the Web Mercator (EPSG:3857) plane in meters.
pub const ORIGIN_SHIFT: f64 = 20037508.342789244;

/// Full width (and height) of the projected plane in meters.
pub const WORLD_CIRCUMFERENCE: f64 = 2.0 * ORIGIN_SHIFT;

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Supported zoom levels
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 22;

/// A point in the geographic frame (EPSG:4326), in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Clamps latitude into the band Web Mercator can represent.
    ///
    /// Projecting a latitude outside [`MIN_LAT`]..=[`MAX_LAT`] yields
    /// unbounded output, so polygon reprojection clamps first.
    pub fn clamp_to_projection(self) -> Self {
        Self {
            lon: self.lon.clamp(MIN_LON, MAX_LON),
            lat: self.lat.clamp(MIN_LAT, MAX_LAT),
        }
    }
}

/// A point in the projected Web Mercator frame (EPSG:3857), in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorPoint {
    pub x: f64,
    pub y: f64,
}

impl MercatorPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Tile coordinates in the XYZ / Slippy Map pyramid.
///
/// Rows count from the top (north) edge of the projected plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileIndex {
    /// Zoom level (0-22)
    pub zoom: u8,
    /// X coordinate (east-west), 0 at west
    pub x: u32,
    /// Y coordinate (north-south), 0 at north
    pub y: u32,
}

impl TileIndex {
    /// Creates a tile index, checking `0 <= x, y < 2^zoom`.
    pub fn new(zoom: u8, x: u32, y: u32) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let n = tiles_per_axis(zoom);
        if x >= n || y >= n {
            return Err(CoordError::TileOutOfRange { zoom, x, y });
        }
        Ok(Self { zoom, x, y })
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Number of tiles along one axis at `zoom`.
#[inline]
pub fn tiles_per_axis(zoom: u8) -> u32 {
    1u32 << zoom
}

/// Axis-aligned rectangle in Web Mercator meters.
///
/// Always derived from a [`TileIndex`] (or an expansion of one), never
/// stored on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileExtent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl TileExtent {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> MercatorPoint {
        MercatorPoint::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Grows the rectangle by `dx` on the left and right and `dy` on the
    /// top and bottom.
    pub fn expand(&self, dx: f64, dy: f64) -> Self {
        Self {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    pub fn to_rect(&self) -> geo::Rect<f64> {
        geo::Rect::new(
            geo::coord! { x: self.min_x, y: self.min_y },
            geo::coord! { x: self.max_x, y: self.max_y },
        )
    }
}

/// Bounding box in geographic degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub lon_min: f64,
    pub lat_min: f64,
    pub lon_max: f64,
    pub lat_max: f64,
}

impl GeoBounds {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.lon_min + self.lon_max) / 2.0,
            (self.lat_min + self.lat_max) / 2.0,
        )
    }

    /// Clamps every edge to the projection's valid band.
    pub fn clamp_to_projection(self) -> Self {
        let min = GeoPoint::new(self.lon_min, self.lat_min).clamp_to_projection();
        let max = GeoPoint::new(self.lon_max, self.lat_max).clamp_to_projection();
        Self {
            lon_min: min.lon,
            lat_min: min.lat,
            lon_max: max.lon,
            lat_max: max.lat,
        }
    }
}

/// Inclusive zoom range, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoomRange {
    min: u8,
    max: u8,
}

impl ZoomRange {
    pub fn new(min: u8, max: u8) -> Result<Self, CoordError> {
        if min > max {
            return Err(CoordError::InvalidZoomRange { min, max });
        }
        if max > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(max));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u8 {
        self.min
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    /// Iterates zoom levels from `min` to `max` inclusive.
    pub fn levels(&self) -> std::ops::RangeInclusive<u8> {
        self.min..=self.max
    }

    /// Integer average of the two ends, used for the archive center.
    pub fn midpoint(&self) -> u8 {
        ((self.min as u16 + self.max as u16) / 2) as u8
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Zoom level is outside valid range (0 to 22)
    InvalidZoom(u8),
    /// Minimum zoom greater than maximum zoom
    InvalidZoomRange { min: u8, max: u8 },
    /// Tile column or row not below 2^zoom
    TileOutOfRange { zoom: u8, x: u32, y: u32 },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
            CoordError::InvalidZoomRange { min, max } => {
                write!(
                    f,
                    "Invalid zoom range: minimum zoom ({}) cannot be greater than maximum zoom ({})",
                    min, max
                )
            }
            CoordError::TileOutOfRange { zoom, x, y } => {
                write!(
                    f,
                    "Tile {}/{}/{} is outside the {}x{} grid",
                    zoom,
                    x,
                    y,
                    tiles_per_axis(*zoom),
                    tiles_per_axis(*zoom)
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
