//! Spatial pre-filtering of the tile pyramid.
//!
//! Finding the tiles to render is a two-phase filter run per zoom level:
//!
//! ```text
//!   polygon (any frame)
//!        │ reproject once
//!        ▼
//!   polygon (Web Mercator) ──► bbox ──► TileRange (clamped)     coarse, O(1)
//!                                           │
//!                                           ▼
//!                          for each candidate: overlaps_extent?  exact
//!                                           │
//!                                           ▼
//!                                        TileList
//! ```
//!
//! [`estimate_tile_count`] stops after the coarse phase and is only meant
//! for preflight feedback.

mod estimate;

pub use estimate::{format_count, EstimateSeverity, TileEstimate, SECONDS_PER_TILE_ESTIMATE};

use std::collections::BTreeMap;

use geo::Rect;
use tracing::debug;

use crate::coord::{
    metric_to_tile, tile_size_meters, tile_to_extent, tiles_per_axis, MercatorPoint, TileIndex,
    ZoomRange, ORIGIN_SHIFT,
};
use crate::shape::ShapePolygon;

/// Clamped rectangle of candidate tiles at one zoom level (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub zoom: u8,
    pub min_x: u32,
    pub max_x: u32,
    pub min_y: u32,
    pub max_y: u32,
}

impl TileRange {
    /// Candidate tiles covered by a Web Mercator bounding box.
    ///
    /// The north-west corner maps with floor semantics. The south-east
    /// corner maps to the last tile the box actually enters, so a box edge
    /// lying exactly on a tile boundary does not pull in the neighbour.
    /// Returns `None` when the box misses the projected plane entirely.
    pub fn for_bounds(bounds: &Rect<f64>, zoom: u8) -> Option<Self> {
        let (min_x, min_y) =
            metric_to_tile(MercatorPoint::new(bounds.min().x, bounds.max().y), zoom);
        let (max_x, max_y) =
            last_tile_entered(MercatorPoint::new(bounds.max().x, bounds.min().y), zoom);

        let limit = tiles_per_axis(zoom) as i64 - 1;
        if max_x < 0 || max_y < 0 || min_x > limit || min_y > limit {
            return None;
        }
        let clamp = |v: i64| v.clamp(0, limit) as u32;
        let (min_x, max_x, min_y, max_y) = (clamp(min_x), clamp(max_x), clamp(min_y), clamp(max_y));
        if min_x > max_x || min_y > max_y {
            return None;
        }

        Some(Self {
            zoom,
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    pub fn columns(&self) -> u64 {
        (self.max_x - self.min_x) as u64 + 1
    }

    pub fn rows(&self) -> u64 {
        (self.max_y - self.min_y) as u64 + 1
    }

    pub fn count(&self) -> u64 {
        self.columns() * self.rows()
    }

    pub fn contains(&self, tile: &TileIndex) -> bool {
        tile.zoom == self.zoom
            && (self.min_x..=self.max_x).contains(&tile.x)
            && (self.min_y..=self.max_y).contains(&tile.y)
    }

    /// Iterates the range column by column, rows ascending within a column.
    pub fn tiles(&self) -> impl Iterator<Item = TileIndex> + '_ {
        (self.min_x..=self.max_x).flat_map(move |x| {
            (self.min_y..=self.max_y).map(move |y| TileIndex {
                zoom: self.zoom,
                x,
                y,
            })
        })
    }
}

/// `(column, row)` of the last tile a south-east corner reaches into.
fn last_tile_entered(point: MercatorPoint, zoom: u8) -> (i64, i64) {
    let size = tile_size_meters(zoom);
    let col = ((point.x + ORIGIN_SHIFT) / size).ceil() as i64 - 1;
    let row = ((ORIGIN_SHIFT - point.y) / size).ceil() as i64 - 1;
    (col, row)
}

/// Ordered, deduplicated list of tiles to generate.
///
/// Zoom-major; within a zoom level tiles follow [`TileRange::tiles`]
/// order. Computed once per run and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileList(Vec<TileIndex>);

impl TileList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<TileIndex> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TileIndex> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[TileIndex] {
        &self.0
    }

    /// Number of tiles at each zoom level.
    pub fn per_zoom_counts(&self) -> BTreeMap<u8, usize> {
        let mut counts = BTreeMap::new();
        for tile in &self.0 {
            *counts.entry(tile.zoom).or_insert(0) += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a TileList {
    type Item = &'a TileIndex;
    type IntoIter = std::slice::Iter<'a, TileIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Candidate ranges for each zoom level, after bbox clamping.
///
/// Zoom levels where the polygon misses the plane are omitted.
pub fn candidate_ranges(polygon: &ShapePolygon, zooms: ZoomRange) -> Vec<TileRange> {
    let mercator = polygon.to_web_mercator();
    match mercator.bounding_rect() {
        Some(bounds) => zooms
            .levels()
            .filter_map(|zoom| TileRange::for_bounds(&bounds, zoom))
            .collect(),
        None => Vec::new(),
    }
}

/// Every tile in `zooms` whose area overlaps `polygon`.
pub fn intersecting_tiles(polygon: &ShapePolygon, zooms: ZoomRange) -> TileList {
    let mercator = polygon.to_web_mercator();
    let Some(bounds) = mercator.bounding_rect() else {
        return TileList::default();
    };

    let mut tiles = Vec::new();
    for zoom in zooms.levels() {
        let Some(range) = TileRange::for_bounds(&bounds, zoom) else {
            continue;
        };
        let before = tiles.len();
        tiles.extend(
            range
                .tiles()
                .filter(|tile| mercator.overlaps_extent(&tile_to_extent(*tile))),
        );
        debug!(
            zoom,
            candidates = range.count(),
            kept = tiles.len() - before,
            "Filtered tile candidates"
        );
    }

    TileList(tiles)
}

/// Upper-bound tile count from bounding boxes alone.
///
/// Cheap enough to recompute on every keystroke of a preflight form; never
/// used to drive generation.
pub fn estimate_tile_count(polygon: &ShapePolygon, zooms: ZoomRange) -> TileEstimate {
    let count = candidate_ranges(polygon, zooms)
        .iter()
        .map(TileRange::count)
        .sum();
    TileEstimate {
        count,
        exact: false,
    }
}
