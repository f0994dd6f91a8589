//! The user-drawn polygon and the geometry operations tiling needs.
//!
//! [`ShapePolygon`] wraps a `geo` multipolygon together with the frame its
//! coordinates are expressed in. Generation always works on a copy
//! reprojected into Web Mercator; the geographic copy is only used for
//! archive bounds.
//!
//! Only the handful of predicates the tiler relies on are exposed:
//! bounding box, rectangle containment, rectangle clipping and the
//! positive-area overlap test used by the spatial filter.

mod error;
mod geojson;

pub use error::ShapeError;

use geo::{
    Area, BooleanOps, BoundingRect, Coord, Intersects, LineString, MapCoords, MultiPolygon,
    Polygon, Rect, Relate,
};

use crate::coord::{project, unproject, GeoBounds, GeoPoint, MercatorPoint, TileExtent};

/// Coordinate reference frame of a polygon's vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordFrame {
    /// Longitude/latitude degrees (EPSG:4326)
    Geographic,
    /// Spherical Web Mercator meters (EPSG:3857)
    WebMercator,
}

/// An immutable polygon (outer rings plus optional holes) in a declared frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePolygon {
    geometry: MultiPolygon<f64>,
    frame: CoordFrame,
}

impl ShapePolygon {
    /// Wraps `geometry`, rejecting empty input, non-finite coordinates and
    /// rings with fewer than three distinct vertices.
    ///
    /// Multi-part input is dissolved into a single valid multipolygon, so
    /// parts that overlap or share edges behave as one area.
    pub fn new(geometry: MultiPolygon<f64>, frame: CoordFrame) -> Result<Self, ShapeError> {
        if geometry.0.is_empty() {
            return Err(ShapeError::Empty);
        }
        for polygon in &geometry.0 {
            validate_ring(polygon.exterior())?;
            for hole in polygon.interiors() {
                validate_ring(hole)?;
            }
        }

        let geometry = dissolve(geometry);
        if geometry.0.is_empty() {
            return Err(ShapeError::Empty);
        }
        Ok(Self { geometry, frame })
    }

    /// Builds a single-ring polygon from vertices in drawing order.
    ///
    /// The ring is closed automatically.
    pub fn from_ring(vertices: &[(f64, f64)], frame: CoordFrame) -> Result<Self, ShapeError> {
        let exterior: LineString<f64> = vertices.iter().copied().collect();
        Self::new(
            MultiPolygon::new(vec![Polygon::new(exterior, vec![])]),
            frame,
        )
    }

    /// Parses a GeoJSON `Polygon`, `MultiPolygon`, `Feature` or
    /// `FeatureCollection`. Every polygonal geometry found is unioned.
    ///
    /// GeoJSON positions are always longitude/latitude.
    pub fn from_geojson_str(text: &str) -> Result<Self, ShapeError> {
        let polygons = geojson::parse_polygons(text)?;
        Self::new(MultiPolygon::new(polygons), CoordFrame::Geographic)
    }

    pub fn frame(&self) -> CoordFrame {
        self.frame
    }

    pub fn geometry(&self) -> &MultiPolygon<f64> {
        &self.geometry
    }

    /// Returns a copy reprojected into Web Mercator.
    ///
    /// Latitudes beyond the projection band are clamped to it.
    pub fn to_web_mercator(&self) -> ShapePolygon {
        match self.frame {
            CoordFrame::WebMercator => self.clone(),
            CoordFrame::Geographic => ShapePolygon {
                geometry: self.geometry.map_coords(|c| {
                    let p = project(GeoPoint::new(c.x, c.y).clamp_to_projection());
                    Coord { x: p.x, y: p.y }
                }),
                frame: CoordFrame::WebMercator,
            },
        }
    }

    /// Returns a copy reprojected into longitude/latitude.
    pub fn to_geographic(&self) -> ShapePolygon {
        match self.frame {
            CoordFrame::Geographic => self.clone(),
            CoordFrame::WebMercator => ShapePolygon {
                geometry: self.geometry.map_coords(|c| {
                    let p = unproject(MercatorPoint::new(c.x, c.y));
                    Coord { x: p.lon, y: p.lat }
                }),
                frame: CoordFrame::Geographic,
            },
        }
    }

    /// Axis-aligned bounding box in this polygon's frame.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.geometry.bounding_rect()
    }

    /// Bounding box in geographic degrees, whatever the polygon's frame.
    pub fn geographic_bounds(&self) -> Option<GeoBounds> {
        let rect = self.to_geographic().bounding_rect()?;
        Some(GeoBounds {
            lon_min: rect.min().x,
            lat_min: rect.min().y,
            lon_max: rect.max().x,
            lat_max: rect.max().y,
        })
    }

    /// True when the whole rectangle lies inside the polygon.
    ///
    /// Rectangle edges may run along the polygon boundary.
    pub fn contains_extent(&self, extent: &TileExtent) -> bool {
        self.geometry
            .relate(&extent.to_rect().to_polygon())
            .is_contains()
    }

    /// True when the rectangle and the polygon share positive area.
    ///
    /// A rectangle that only touches the polygon along an edge or at a
    /// vertex does not overlap it.
    pub fn overlaps_extent(&self, extent: &TileExtent) -> bool {
        let rect = extent.to_rect().to_polygon();
        if !self.geometry.intersects(&rect) {
            return false;
        }
        self.clip_to_extent(extent).unsigned_area() > 0.0
    }

    /// Intersection of the polygon with the rectangle.
    pub fn clip_to_extent(&self, extent: &TileExtent) -> MultiPolygon<f64> {
        let rect = MultiPolygon::new(vec![extent.to_rect().to_polygon()]);
        self.geometry.intersection(&rect)
    }

    /// True when the polygon encloses no area.
    pub fn is_empty(&self) -> bool {
        is_empty_geometry(&self.geometry)
    }
}

/// True when `geometry` has no polygons or zero total area.
pub fn is_empty_geometry(geometry: &MultiPolygon<f64>) -> bool {
    geometry.0.is_empty() || geometry.unsigned_area() <= 0.0
}

/// Unions the parts of `geometry` into one valid multipolygon.
fn dissolve(geometry: MultiPolygon<f64>) -> MultiPolygon<f64> {
    if geometry.0.len() < 2 {
        return geometry;
    }
    let mut parts = geometry.0.into_iter();
    let mut merged = MultiPolygon::new(parts.next().into_iter().collect());
    for part in parts {
        merged = merged.union(&MultiPolygon::new(vec![part]));
    }
    MultiPolygon::new(
        merged
            .0
            .into_iter()
            .filter(|p| p.unsigned_area() > 0.0)
            .collect(),
    )
}

fn validate_ring(ring: &LineString<f64>) -> Result<(), ShapeError> {
    if ring.coords().any(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(ShapeError::NonFiniteCoordinate);
    }

    // three distinct vertices are enough, so stop scanning there
    let mut distinct: Vec<Coord<f64>> = Vec::with_capacity(3);
    for c in ring.coords() {
        if !distinct.contains(c) {
            distinct.push(*c);
            if distinct.len() == 3 {
                return Ok(());
            }
        }
    }
    Err(ShapeError::DegenerateRing {
        vertices: distinct.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{tile_to_extent, TileIndex, ORIGIN_SHIFT};

    fn square(min: f64, max: f64, frame: CoordFrame) -> ShapePolygon {
        ShapePolygon::from_ring(&[(min, min), (max, min), (max, max), (min, max)], frame)
            .unwrap()
    }

    #[test]
    fn test_from_ring_closes_ring() {
        let shape = square(0.0, 1.0, CoordFrame::Geographic);
        let ring = &shape.geometry().0[0].exterior().0;
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring.len(), 5);
    }

    #[test]
    fn test_degenerate_ring_rejected() {
        let err = ShapePolygon::from_ring(&[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)], CoordFrame::Geographic)
            .unwrap_err();
        assert!(matches!(err, ShapeError::DegenerateRing { vertices: 2 }));
    }

    #[test]
    fn test_long_ring_validates_quickly() {
        // a dense circle; validation must not scan every vertex pair
        let n = 500_000;
        let vertices: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let angle = i as f64 / n as f64 * std::f64::consts::TAU;
                (angle.cos() * 10.0, angle.sin() * 10.0)
            })
            .collect();
        let started = std::time::Instant::now();
        let shape = ShapePolygon::from_ring(&vertices, CoordFrame::Geographic).unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
        assert_eq!(shape.geometry().0.len(), 1);
    }

    #[test]
    fn test_overlapping_parts_are_dissolved() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,10],[0,0]]]}},
            {"type":"Feature","properties":{},
             "geometry":{"type":"Polygon","coordinates":[[[5,5],[15,5],[15,15],[5,15],[5,5]]]}}
        ]}"#;
        let shape = ShapePolygon::from_geojson_str(text).unwrap();
        assert_eq!(shape.geometry().0.len(), 1);
        assert!((shape.geometry().unsigned_area() - 175.0).abs() < 1e-9);

        let mercator = shape.to_web_mercator();
        let inner = TileExtent {
            min_x: 100_000.0,
            min_y: 100_000.0,
            max_x: 200_000.0,
            max_y: 200_000.0,
        };
        assert!(mercator.contains_extent(&inner));
    }

    #[test]
    fn test_disjoint_parts_are_kept() {
        let text = r#"{"type":"MultiPolygon","coordinates":[
            [[[0,0],[1,0],[1,1],[0,1],[0,0]]],
            [[[5,5],[6,5],[6,6],[5,6],[5,5]]]
        ]}"#;
        let shape = ShapePolygon::from_geojson_str(text).unwrap();
        assert_eq!(shape.geometry().0.len(), 2);
        assert!((shape.geometry().unsigned_area() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_rejected() {
        let err = ShapePolygon::new(MultiPolygon::new(vec![]), CoordFrame::WebMercator).unwrap_err();
        assert!(matches!(err, ShapeError::Empty));
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = ShapePolygon::from_ring(
            &[(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)],
            CoordFrame::Geographic,
        )
        .unwrap_err();
        assert!(matches!(err, ShapeError::NonFiniteCoordinate));
    }

    #[test]
    fn test_reprojection_roundtrip() {
        let shape = square(-10.0, 10.0, CoordFrame::Geographic);
        let mercator = shape.to_web_mercator();
        assert_eq!(mercator.frame(), CoordFrame::WebMercator);

        let rect = mercator.bounding_rect().unwrap();
        assert!((rect.max().x - ORIGIN_SHIFT / 18.0).abs() < 1e-6);

        let back = mercator.to_geographic().bounding_rect().unwrap();
        assert!((back.min().x + 10.0).abs() < 1e-9);
        assert!((back.max().y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_reprojection_clamps_poles() {
        let shape = ShapePolygon::from_ring(
            &[(-10.0, 80.0), (10.0, 80.0), (10.0, 90.0), (-10.0, 90.0)],
            CoordFrame::Geographic,
        )
        .unwrap();
        let rect = shape.to_web_mercator().bounding_rect().unwrap();
        assert!(rect.max().y.is_finite());
        assert!(rect.max().y <= ORIGIN_SHIFT + 1.0);
    }

    #[test]
    fn test_geographic_bounds_from_mercator() {
        let shape = square(-10.0, 10.0, CoordFrame::Geographic).to_web_mercator();
        let bounds = shape.geographic_bounds().unwrap();
        assert!((bounds.lon_min + 10.0).abs() < 1e-9);
        assert!((bounds.lat_max - 10.0).abs() < 1e-9);
        let center = bounds.center();
        assert!(center.lon.abs() < 1e-9 && center.lat.abs() < 1e-9);
    }

    #[test]
    fn test_contains_extent() {
        let tile = TileIndex::new(4, 8, 8).unwrap();
        let extent = tile_to_extent(tile);
        let big = square(-ORIGIN_SHIFT / 2.0, ORIGIN_SHIFT / 2.0, CoordFrame::WebMercator);
        assert!(big.contains_extent(&extent));

        let small = square(0.0, 1000.0, CoordFrame::WebMercator);
        assert!(!small.contains_extent(&extent));
    }

    #[test]
    fn test_contains_extent_with_shared_boundary() {
        let extent = tile_to_extent(TileIndex::new(2, 1, 1).unwrap());
        let exact = ShapePolygon::new(
            MultiPolygon::new(vec![extent.to_rect().to_polygon()]),
            CoordFrame::WebMercator,
        )
        .unwrap();
        assert!(exact.contains_extent(&extent));
    }

    #[test]
    fn test_overlaps_excludes_edge_touch() {
        let a = tile_to_extent(TileIndex::new(2, 1, 1).unwrap());
        let b = tile_to_extent(TileIndex::new(2, 2, 1).unwrap());
        let shape = ShapePolygon::new(
            MultiPolygon::new(vec![a.to_rect().to_polygon()]),
            CoordFrame::WebMercator,
        )
        .unwrap();
        assert!(shape.overlaps_extent(&a));
        assert!(!shape.overlaps_extent(&b));
    }

    #[test]
    fn test_clip_to_extent_respects_holes() {
        let outer = LineString::from(vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
        let hole = LineString::from(vec![(40.0, 40.0), (60.0, 40.0), (60.0, 60.0), (40.0, 60.0)]);
        let shape = ShapePolygon::new(
            MultiPolygon::new(vec![Polygon::new(outer, vec![hole])]),
            CoordFrame::WebMercator,
        )
        .unwrap();

        let inside_hole = TileExtent {
            min_x: 45.0,
            min_y: 45.0,
            max_x: 55.0,
            max_y: 55.0,
        };
        assert!(is_empty_geometry(&shape.clip_to_extent(&inside_hole)));
        assert!(!shape.overlaps_extent(&inside_hole));

        let straddling = TileExtent {
            min_x: 30.0,
            min_y: 30.0,
            max_x: 70.0,
            max_y: 70.0,
        };
        let clipped = shape.clip_to_extent(&straddling);
        assert!((clipped.unsigned_area() - (1600.0 - 400.0)).abs() < 1e-6);
    }

    #[test]
    fn test_is_empty() {
        assert!(!square(0.0, 1.0, CoordFrame::WebMercator).is_empty());
    }
}
