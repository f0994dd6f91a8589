//! Clip region construction.

use geo::MultiPolygon;
use tiny_skia::{FillRule, Mask, Path, PathBuilder, Transform};

use super::{RenderError, RenderRequest};
use crate::coord::TileExtent;
use crate::shape::{is_empty_geometry, ShapePolygon};

/// Which clipping path a tile took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipKind {
    /// Tile lies wholly inside the polygon; drawn without a clip
    Unclipped,
    /// Drawn through a mask built from the clipped polygon
    Clipped,
    /// No overlap with the render extent; background only
    Empty,
}

pub(crate) enum ClipPlan {
    Unclipped,
    Clipped(Mask),
    Empty,
}

impl ClipPlan {
    /// Decides how to clip one tile.
    ///
    /// Containment is tested against the tile itself; the clip geometry is
    /// cut from the larger render extent so the buffer is masked too.
    pub(crate) fn for_tile(
        shape: &ShapePolygon,
        tile_extent: &TileExtent,
        request: &RenderRequest,
    ) -> Result<Self, RenderError> {
        if shape.contains_extent(tile_extent) {
            return Ok(ClipPlan::Unclipped);
        }

        let clipped = shape.clip_to_extent(&request.extent);
        if is_empty_geometry(&clipped) {
            return Ok(ClipPlan::Empty);
        }

        let Some(path) = geometry_to_path(&clipped, request) else {
            return Ok(ClipPlan::Empty);
        };

        let mut mask = Mask::new(request.width, request.height).ok_or(RenderError::Canvas {
            width: request.width,
            height: request.height,
        })?;
        mask.fill_path(
            &path,
            FillRule::EvenOdd,
            request.antialias,
            Transform::identity(),
        );
        Ok(ClipPlan::Clipped(mask))
    }

    pub(crate) fn kind(&self) -> ClipKind {
        match self {
            ClipPlan::Unclipped => ClipKind::Unclipped,
            ClipPlan::Clipped(_) => ClipKind::Clipped,
            ClipPlan::Empty => ClipKind::Empty,
        }
    }

    pub(crate) fn mask(&self) -> Option<&Mask> {
        match self {
            ClipPlan::Clipped(mask) => Some(mask),
            _ => None,
        }
    }
}

/// Converts every ring (outer and holes) into a closed subpath in canvas
/// pixels.
pub(crate) fn geometry_to_path(geometry: &MultiPolygon<f64>, request: &RenderRequest) -> Option<Path> {
    let mut builder = PathBuilder::new();

    for polygon in geometry {
        let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
        for ring in rings {
            let mut coords = ring.coords();
            let Some(first) = coords.next() else {
                continue;
            };
            let (x, y) = request.to_pixel(first.x, first.y);
            builder.move_to(x, y);
            for c in coords {
                let (x, y) = request.to_pixel(c.x, c.y);
                builder.line_to(x, y);
            }
            builder.close();
        }
    }

    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{tile_to_extent, TileIndex};
    use crate::shape::CoordFrame;
    use geo::{LineString, Polygon};

    fn request_for(extent: TileExtent) -> RenderRequest {
        RenderRequest {
            extent,
            width: 256,
            height: 256,
            dpi: 96,
            antialias: false,
        }
    }

    fn square(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<(f64, f64)> {
        vec![(min_x, min_y), (max_x, min_y), (max_x, max_y), (min_x, max_y)]
    }

    #[test]
    fn test_contained_tile_is_unclipped() {
        let extent = tile_to_extent(TileIndex::new(2, 1, 1).unwrap());
        let shape = ShapePolygon::from_ring(
            &square(
                extent.min_x - 1000.0,
                extent.min_y - 1000.0,
                extent.max_x + 1000.0,
                extent.max_y + 1000.0,
            ),
            CoordFrame::WebMercator,
        )
        .unwrap();

        let plan = ClipPlan::for_tile(&shape, &extent, &request_for(extent)).unwrap();
        assert_eq!(plan.kind(), ClipKind::Unclipped);
        assert!(plan.mask().is_none());
    }

    #[test]
    fn test_disjoint_tile_is_empty() {
        let extent = TileExtent {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 100.0,
            max_y: 100.0,
        };
        let shape =
            ShapePolygon::from_ring(&square(500.0, 500.0, 600.0, 600.0), CoordFrame::WebMercator)
                .unwrap();

        let plan = ClipPlan::for_tile(&shape, &extent, &request_for(extent)).unwrap();
        assert_eq!(plan.kind(), ClipKind::Empty);
    }

    #[test]
    fn test_mask_covers_left_half_and_respects_holes() {
        let extent = TileExtent {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 256.0,
            max_y: 256.0,
        };
        let exterior = LineString::from(vec![
            (-10.0, -10.0),
            (128.0, -10.0),
            (128.0, 266.0),
            (-10.0, 266.0),
            (-10.0, -10.0),
        ]);
        let hole = LineString::from(vec![
            (32.0, 32.0),
            (96.0, 32.0),
            (96.0, 96.0),
            (32.0, 96.0),
            (32.0, 32.0),
        ]);
        let shape = ShapePolygon::new(
            MultiPolygon::new(vec![Polygon::new(exterior, vec![hole])]),
            CoordFrame::WebMercator,
        )
        .unwrap();

        let plan = ClipPlan::for_tile(&shape, &extent, &request_for(extent)).unwrap();
        assert_eq!(plan.kind(), ClipKind::Clipped);
        let mask = plan.mask().unwrap();
        let at = |x: u32, y: u32| mask.data()[(y * 256 + x) as usize];

        // left half is inside, right half outside
        assert_eq!(at(10, 10), 255);
        assert_eq!(at(200, 10), 0);
        // the hole sits at meters 32..96, i.e. pixel rows 160..224
        assert_eq!(at(64, 192), 0);
        assert_eq!(at(64, 64), 255);
    }
}
