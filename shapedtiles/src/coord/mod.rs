//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (longitude/latitude),
//! spherical Web Mercator meters, and XYZ tile indices.

mod types;


pub use types::{
    tiles_per_axis, CoordError, GeoBounds, GeoPoint, MercatorPoint, TileExtent, TileIndex, ZoomRange,
    MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM, ORIGIN_SHIFT, TILE_SIZE,
    WORLD_CIRCUMFERENCE,
};

use std::f64::consts::PI;

/// Projects a geographic point into Web Mercator meters.
///
/// Longitude scales linearly; latitude uses `ln(tan(45° + lat/2))`.
/// Only defined inside [`MIN_LAT`]..=[`MAX_LAT`]: outside that band the
/// result grows without bound, so callers clamp or reject first
/// (see [`GeoPoint::clamp_to_projection`]).
#[inline]
pub fn project(point: GeoPoint) -> MercatorPoint {
    let x = point.lon * ORIGIN_SHIFT / 180.0;
    let y = ((90.0 + point.lat) * PI / 360.0).tan().ln() / (PI / 180.0);
    MercatorPoint::new(x, y * ORIGIN_SHIFT / 180.0)
}

/// Inverse of [`project`].
#[inline]
pub fn unproject(point: MercatorPoint) -> GeoPoint {
    let lon = point.x / ORIGIN_SHIFT * 180.0;
    let lat = (2.0 * (point.y / ORIGIN_SHIFT * PI).exp().atan() - PI / 2.0) * 180.0 / PI;
    GeoPoint::new(lon, lat)
}

/// Edge length of one tile at `zoom`, in meters.
#[inline]
pub fn tile_size_meters(zoom: u8) -> f64 {
    WORLD_CIRCUMFERENCE / tiles_per_axis(zoom) as f64
}

/// Converts Web Mercator meters to the `(column, row)` of the containing
/// tile at `zoom`.
///
/// The result is not clamped: points off the plane give negative indices
/// or indices `>= 2^zoom`. A point exactly on a tile boundary belongs to
/// the higher-index tile.
#[inline]
pub fn metric_to_tile(point: MercatorPoint, zoom: u8) -> (i64, i64) {
    let size = tile_size_meters(zoom);
    let col = ((point.x + ORIGIN_SHIFT) / size).floor() as i64;
    let row = ((ORIGIN_SHIFT - point.y) / size).floor() as i64;
    (col, row)
}

/// Returns the Web Mercator rectangle covered by `tile`.
///
/// Each edge is computed from the same expression its neighbour uses, so
/// adjacent tiles share boundary coordinates exactly.
#[inline]
pub fn tile_to_extent(tile: TileIndex) -> TileExtent {
    let size = tile_size_meters(tile.zoom);
    TileExtent {
        min_x: tile.x as f64 * size - ORIGIN_SHIFT,
        max_x: (tile.x as f64 + 1.0) * size - ORIGIN_SHIFT,
        max_y: ORIGIN_SHIFT - tile.y as f64 * size,
        min_y: ORIGIN_SHIFT - (tile.y as f64 + 1.0) * size,
    }
}

/// Returns `tile` as a closed four-vertex polygon in Web Mercator meters.
pub fn tile_to_polygon(tile: TileIndex) -> geo::Polygon<f64> {
    tile_to_extent(tile).to_rect().to_polygon()
}

/// Converts an XYZ row (origin at the top) to the bottom-origin row used
/// by MBTiles.
///
/// The conversion is its own inverse.
#[inline]
pub fn tile_row_tms(zoom: u8, row: u32) -> u32 {
    tiles_per_axis(zoom) - 1 - row
}
