//! Minimal GeoJSON reader for polygon input.
//!
//! Only the polygonal subset is understood; other geometry types are
//! skipped so a FeatureCollection mixing points and polygons still loads.

use geo::{Coord, LineString, Polygon};
use serde::Deserialize;

use super::ShapeError;

type Position = Vec<f64>;
type Ring = Vec<Position>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonObject {
    FeatureCollection {
        features: Vec<GeoJsonObject>,
    },
    Feature {
        geometry: Option<Box<GeoJsonObject>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonObject>,
    },
    Polygon {
        coordinates: Vec<Ring>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Ring>>,
    },
    #[serde(other)]
    Other,
}

/// Extracts every polygon in `text`, in document order.
pub(super) fn parse_polygons(text: &str) -> Result<Vec<Polygon<f64>>, ShapeError> {
    let root: GeoJsonObject = serde_json::from_str(text)?;
    let mut polygons = Vec::new();
    collect(&root, &mut polygons)?;

    if polygons.is_empty() {
        return Err(ShapeError::NoPolygon(describe(&root).to_string()));
    }
    Ok(polygons)
}

fn collect(object: &GeoJsonObject, out: &mut Vec<Polygon<f64>>) -> Result<(), ShapeError> {
    match object {
        GeoJsonObject::FeatureCollection { features } => {
            for feature in features {
                collect(feature, out)?;
            }
        }
        GeoJsonObject::Feature { geometry } => {
            if let Some(geometry) = geometry {
                collect(geometry, out)?;
            }
        }
        GeoJsonObject::GeometryCollection { geometries } => {
            for geometry in geometries {
                collect(geometry, out)?;
            }
        }
        GeoJsonObject::Polygon { coordinates } => {
            if let Some(polygon) = to_polygon(coordinates)? {
                out.push(polygon);
            }
        }
        GeoJsonObject::MultiPolygon { coordinates } => {
            for rings in coordinates {
                if let Some(polygon) = to_polygon(rings)? {
                    out.push(polygon);
                }
            }
        }
        GeoJsonObject::Other => {}
    }
    Ok(())
}

fn to_polygon(rings: &[Ring]) -> Result<Option<Polygon<f64>>, ShapeError> {
    let mut rings = rings.iter().map(|ring| to_line_string(ring));
    let exterior = match rings.next() {
        Some(exterior) => exterior?,
        None => return Ok(None),
    };
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Some(Polygon::new(exterior, interiors)))
}

fn to_line_string(ring: &[Position]) -> Result<LineString<f64>, ShapeError> {
    ring.iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            short => Err(ShapeError::ShortPosition(short.len())),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

fn describe(object: &GeoJsonObject) -> &'static str {
    match object {
        GeoJsonObject::FeatureCollection { .. } => "FeatureCollection",
        GeoJsonObject::Feature { .. } => "Feature",
        GeoJsonObject::GeometryCollection { .. } => "GeometryCollection",
        GeoJsonObject::Polygon { .. } => "Polygon",
        GeoJsonObject::MultiPolygon { .. } => "MultiPolygon",
        GeoJsonObject::Other => "non-polygonal geometry",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_polygon() {
        let text = r#"{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,1],[0,0]]]}"#;
        let polygons = parse_polygons(text).unwrap();
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].exterior().0.len(), 5);
    }

    #[test]
    fn test_polygon_with_hole_and_altitude() {
        let text = r#"{"type":"Polygon","coordinates":[
            [[0,0,10],[10,0,10],[10,10,10],[0,10,10],[0,0,10]],
            [[4,4],[6,4],[6,6],[4,6],[4,4]]
        ]}"#;
        let polygons = parse_polygons(text).unwrap();
        assert_eq!(polygons[0].interiors().len(), 1);
    }

    #[test]
    fn test_feature_collection_merges_polygons_and_skips_points() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"name":"a"},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[1,0],[1,1],[0,0]]]}},
            {"type":"Feature","properties":{},
             "geometry":{"type":"Point","coordinates":[5,5]}},
            {"type":"Feature","properties":null,"geometry":null},
            {"type":"Feature","properties":{},
             "geometry":{"type":"MultiPolygon","coordinates":[
                [[[2,2],[3,2],[3,3],[2,2]]],
                [[[4,4],[5,4],[5,5],[4,4]]]
             ]}}
        ]}"#;
        assert_eq!(parse_polygons(text).unwrap().len(), 3);
    }

    #[test]
    fn test_no_polygon_is_error() {
        let text = r#"{"type":"Point","coordinates":[1,2]}"#;
        let err = parse_polygons(text).unwrap_err();
        assert!(matches!(err, ShapeError::NoPolygon(_)));
    }

    #[test]
    fn test_short_position_is_error() {
        let text = r#"{"type":"Polygon","coordinates":[[[0],[1,0],[1,1],[0,0]]]}"#;
        assert!(matches!(
            parse_polygons(text).unwrap_err(),
            ShapeError::ShortPosition(1)
        ));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            parse_polygons("{not json").unwrap_err(),
            ShapeError::InvalidGeoJson(_)
        ));
    }
}
