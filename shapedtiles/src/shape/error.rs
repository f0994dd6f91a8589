//! Error types for polygon input.

use thiserror::Error;

/// Errors raised while building a [`super::ShapePolygon`].
#[derive(Debug, Error)]
pub enum ShapeError {
    /// No polygons were supplied
    #[error("polygon has no rings")]
    Empty,

    /// A ring has too few distinct vertices to enclose area
    #[error("polygon ring has {vertices} distinct vertices (need at least 3)")]
    DegenerateRing { vertices: usize },

    /// A vertex is NaN or infinite
    #[error("polygon contains a non-finite coordinate")]
    NonFiniteCoordinate,

    /// The input is not valid GeoJSON
    #[error("invalid GeoJSON: {0}")]
    InvalidGeoJson(#[from] serde_json::Error),

    /// The GeoJSON holds no Polygon or MultiPolygon geometry
    #[error("no polygon geometry found in GeoJSON (found: {0})")]
    NoPolygon(String),

    /// A position has fewer than two ordinates
    #[error("GeoJSON position has {0} ordinates (need at least 2)")]
    ShortPosition(usize),
}
