//! A self-contained map renderer drawing a longitude/latitude grid.
//!
//! Useful on its own for previewing a polygon's coverage, and for spotting
//! seams between neighbouring meta-tiles: grid lines must continue across
//! tile edges without a jump.

use tiny_skia::{Paint, PathBuilder, PixmapMut, Rect, Stroke, Transform};

use super::{MapRenderer, RenderError, RenderRequest, Rgba};
use crate::coord::{project, unproject, GeoPoint, MercatorPoint, MAX_LAT, MIN_LAT};

/// Grid steps tried from coarsest to finest, in degrees.
const STEPS: [f64; 12] = [
    30.0, 10.0, 5.0, 2.0, 1.0, 0.5, 0.2, 0.1, 0.05, 0.02, 0.01, 0.005,
];

/// Roughly how many grid cells should span the render width.
const TARGET_CELLS: f64 = 4.0;

/// Most grid lines drawn across the render width with a fixed spacing.
const MAX_LINES: f64 = 128.0;

/// Draws a checkerboard of grid cells and the grid lines between them.
#[derive(Debug, Clone)]
pub struct GraticuleRenderer {
    spacing: Option<f64>,
    line: Rgba,
    tint: Rgba,
    line_width: f32,
}

impl Default for GraticuleRenderer {
    fn default() -> Self {
        Self {
            spacing: None,
            line: Rgba::opaque(70, 90, 120),
            tint: Rgba::new(120, 160, 200, 90),
            line_width: 1.0,
        }
    }
}

impl GraticuleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a fixed grid step instead of one picked from the extent width.
    ///
    /// Steps finer than the finest adaptive step are raised to it.
    pub fn with_spacing(mut self, degrees: f64) -> Self {
        self.spacing = Some(degrees)
            .filter(|d| d.is_finite() && *d > 0.0)
            .map(|d| d.max(STEPS[STEPS.len() - 1]));
        self
    }

    pub fn with_colors(mut self, line: Rgba, tint: Rgba) -> Self {
        self.line = line;
        self.tint = tint;
        self
    }

    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    /// Grid step for an extent `lon_span` degrees wide.
    ///
    /// Every tile of one zoom level has the same longitude span, so the
    /// step is stable across a zoom level. A fixed step that would draw
    /// more than `MAX_LINES` lines is widened to a multiple of itself.
    pub fn spacing_for(&self, lon_span: f64) -> f64 {
        if let Some(spacing) = self.spacing {
            let factor = (lon_span / spacing / MAX_LINES).ceil().max(1.0);
            return spacing * factor;
        }
        STEPS
            .iter()
            .copied()
            .find(|step| lon_span / step >= TARGET_CELLS)
            .unwrap_or(STEPS[STEPS.len() - 1])
    }
}

impl MapRenderer for GraticuleRenderer {
    fn render(
        &mut self,
        request: &RenderRequest,
        canvas: &mut PixmapMut<'_>,
    ) -> Result<(), RenderError> {
        let extent = &request.extent;
        let south_west = unproject(MercatorPoint::new(extent.min_x, extent.min_y));
        let north_east = unproject(MercatorPoint::new(extent.max_x, extent.max_y));
        let step = self.spacing_for(north_east.lon - south_west.lon);

        let lon_lines = grid_values(south_west.lon, north_east.lon, step);
        let lat_lines = grid_values(
            south_west.lat.max(MIN_LAT),
            north_east.lat.min(MAX_LAT),
            step,
        );

        let mut tint = Paint::default();
        tint.set_color(self.tint.to_color());
        tint.anti_alias = request.antialias;

        for lon in lon_lines.windows(2) {
            for lat in lat_lines.windows(2) {
                if (cell_parity(lon[0], step) + cell_parity(lat[0], step)) % 2 != 0 {
                    continue;
                }
                let (x0, y0) = pixel(request, lon[0], lat[1]);
                let (x1, y1) = pixel(request, lon[1], lat[0]);
                if let Some(rect) = Rect::from_ltrb(x0, y0, x1, y1) {
                    canvas.fill_rect(rect, &tint, Transform::identity(), None);
                }
            }
        }

        let mut builder = PathBuilder::new();
        for &lon in &lon_lines {
            let (x, _) = pixel(request, lon, 0.0);
            builder.move_to(x, 0.0);
            builder.line_to(x, request.height as f32);
        }
        for &lat in &lat_lines {
            let (_, y) = pixel(request, 0.0, lat);
            builder.move_to(0.0, y);
            builder.line_to(request.width as f32, y);
        }

        if let Some(path) = builder.finish() {
            let mut paint = Paint::default();
            paint.set_color(self.line.to_color());
            paint.anti_alias = request.antialias;
            let stroke = Stroke {
                width: self.line_width * request.scale(),
                ..Default::default()
            };
            canvas.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "graticule"
    }
}

/// Grid values covering `[min, max]`, including one step past each end so
/// cells at the canvas edges are complete.
fn grid_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    if min >= max {
        return Vec::new();
    }
    let first = (min / step).floor() as i64;
    let last = (max / step).ceil() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}

/// Parity of the grid cell index of `value`, so the checkerboard lines up
/// across tiles whatever the first visible line is.
fn cell_parity(value: f64, step: f64) -> usize {
    ((value / step).round() as i64).rem_euclid(2) as usize
}

fn pixel(request: &RenderRequest, lon: f64, lat: f64) -> (f32, f32) {
    let p = project(GeoPoint::new(lon, lat.clamp(MIN_LAT, MAX_LAT)));
    request.to_pixel(p.x, p.y)
}
