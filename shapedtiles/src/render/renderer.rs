//! The map renderer collaborator.

use tiny_skia::PixmapMut;

use super::RenderError;
use crate::coord::TileExtent;

/// What the collaborator is asked to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    /// Area to draw, in Web Mercator meters
    pub extent: TileExtent,
    pub width: u32,
    pub height: u32,
    pub dpi: u32,
    pub antialias: bool,
}

impl RenderRequest {
    /// Maps a Web Mercator coordinate to canvas pixels (y grows downward).
    pub fn to_pixel(&self, x: f64, y: f64) -> (f32, f32) {
        let px = (x - self.extent.min_x) * self.width as f64 / self.extent.width();
        let py = (self.extent.max_y - y) * self.height as f64 / self.extent.height();
        (px as f32, py as f32)
    }

    /// Scale factor relative to a 96 DPI screen.
    pub fn scale(&self) -> f32 {
        self.dpi as f32 / 96.0
    }
}

/// Draws map layers for a rectangle of the Web Mercator plane.
///
/// The canvas handed to [`render`](Self::render) is transparent and exactly
/// `request.width x request.height`. Implementations may draw anywhere on
/// it; the caller applies the clip region when compositing the result.
///
/// Renderers are driven from a single thread, one tile at a time, so no
/// `Send`/`Sync` bounds are required.
pub trait MapRenderer {
    fn render(
        &mut self,
        request: &RenderRequest,
        canvas: &mut PixmapMut<'_>,
    ) -> Result<(), RenderError>;

    /// Name used in logs.
    fn name(&self) -> &str {
        "map renderer"
    }
}

impl<R: MapRenderer + ?Sized> MapRenderer for Box<R> {
    fn render(
        &mut self,
        request: &RenderRequest,
        canvas: &mut PixmapMut<'_>,
    ) -> Result<(), RenderError> {
        (**self).render(request, canvas)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pixel_flips_y() {
        let request = RenderRequest {
            extent: TileExtent {
                min_x: 100.0,
                min_y: 200.0,
                max_x: 300.0,
                max_y: 400.0,
            },
            width: 512,
            height: 512,
            dpi: 192,
            antialias: true,
        };

        assert_eq!(request.to_pixel(100.0, 400.0), (0.0, 0.0));
        assert_eq!(request.to_pixel(300.0, 200.0), (512.0, 512.0));
        assert_eq!(request.to_pixel(200.0, 250.0), (256.0, 384.0));
        assert_eq!(request.scale(), 2.0);
    }
}
