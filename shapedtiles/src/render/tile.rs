//! Per-tile rendering through the polygon clip.

use image::RgbaImage;
use tiny_skia::{Pixmap, PixmapPaint, Transform};
use tracing::trace;

use super::clip::{ClipKind, ClipPlan};
use super::{MapRenderer, RenderError, RenderOptions, RenderRequest};
use crate::coord::{tile_to_extent, TileExtent, TileIndex, TILE_SIZE};
use crate::shape::ShapePolygon;

/// One finished tile.
#[derive(Debug, Clone)]
pub struct RenderedTile {
    pub image: RgbaImage,
    pub clip: ClipKind,
}

/// Renders tiles of a map, masked to a polygon.
///
/// Each tile is drawn on an enlarged canvas (the meta-tile) whose extra
/// pixels cover a real buffer of map around the tile, then cropped back to
/// `TILE_SIZE`. Pixels outside the polygon keep the canvas background.
pub struct ShapedTileRenderer<R> {
    shape: ShapePolygon,
    renderer: R,
    options: RenderOptions,
}

impl<R: MapRenderer> ShapedTileRenderer<R> {
    /// `shape` may be in either frame; it is reprojected to Web Mercator.
    pub fn new(shape: &ShapePolygon, renderer: R, options: RenderOptions) -> Self {
        Self {
            shape: shape.to_web_mercator(),
            renderer,
            options,
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Web Mercator area covered by the render canvas for `tile`.
    pub fn render_extent(&self, tile: TileIndex) -> TileExtent {
        let extent = tile_to_extent(tile);
        let buffer = self.options.buffer_pixels() as f64;
        let meters_per_pixel = extent.width() / TILE_SIZE as f64;
        extent.expand(buffer * meters_per_pixel, buffer * meters_per_pixel)
    }

    pub fn render_tile(&mut self, tile: TileIndex) -> Result<RenderedTile, RenderError> {
        let size = self.options.render_size();
        let request = RenderRequest {
            extent: self.render_extent(tile),
            width: size,
            height: size,
            dpi: self.options.dpi(),
            antialias: self.options.antialias(),
        };

        let canvas_error = || RenderError::Canvas {
            width: size,
            height: size,
        };
        let mut canvas = Pixmap::new(size, size).ok_or_else(canvas_error)?;
        canvas.fill(self.options.canvas_background().to_color());

        let plan = ClipPlan::for_tile(&self.shape, &tile_to_extent(tile), &request)?;
        if !matches!(plan, ClipPlan::Empty) {
            let mut layer = Pixmap::new(size, size).ok_or_else(canvas_error)?;
            self.renderer.render(&request, &mut layer.as_mut())?;
            canvas.draw_pixmap(
                0,
                0,
                layer.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                plan.mask(),
            );
        }

        trace!(tile = %tile, clip = ?plan.kind(), size, "Rendered tile");

        Ok(RenderedTile {
            image: crop_center(&canvas, self.options.buffer_pixels()),
            clip: plan.kind(),
        })
    }
}

/// Copies the central `TILE_SIZE` square out of `canvas`, demultiplying
/// alpha on the way.
fn crop_center(canvas: &Pixmap, offset: u32) -> RgbaImage {
    let stride = canvas.width() as usize;
    let pixels = canvas.pixels();
    RgbaImage::from_fn(TILE_SIZE, TILE_SIZE, |x, y| {
        let idx = (y + offset) as usize * stride + (x + offset) as usize;
        let c = pixels[idx].demultiply();
        image::Rgba([c.red(), c.green(), c.blue(), c.alpha()])
    })
}
