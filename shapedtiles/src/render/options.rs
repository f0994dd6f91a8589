//! Render options and colour handling.

use std::fmt;
use std::str::FromStr;

use crate::coord::TILE_SIZE;
use crate::encode::TileFormat;

use super::RenderError;

/// Upper bound on the meta-tile multiplier.
pub const MAX_METATILE_SIZE: u32 = 16;

/// Upper bound on the render canvas edge, independent of the multiplier.
pub const MAX_RENDER_PIXELS: u32 = 4096;

pub const DEFAULT_METATILE_SIZE: u32 = 4;

pub const DEFAULT_DPI: u32 = 96;
pub const MIN_DPI: u32 = 48;
pub const MAX_DPI: u32 = 384;

/// Render memory above which the CLI warns before starting.
pub const MEMORY_WARNING_MB: f64 = 200.0;

/// Edge length in pixels of the canvas rendered for one tile.
pub fn render_size(metatile_size: u32) -> u32 {
    let m = metatile_size.clamp(1, MAX_METATILE_SIZE);
    (TILE_SIZE * m).min(MAX_RENDER_PIXELS)
}

/// Approximate peak memory for one render canvas, in MiB.
///
/// Four bytes per pixel plus half again for the clip mask and the
/// collaborator's layer.
pub fn estimate_render_memory_mb(metatile_size: u32) -> f64 {
    let size = render_size(metatile_size) as f64;
    size * size * 4.0 * 1.5 / (1024.0 * 1024.0)
}

/// A straight-alpha RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    pub fn to_color(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Rgba {
    type Err = RenderError;

    /// Parses `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RenderError::InvalidColor(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

/// How each tile is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    format: TileFormat,
    background: Option<Rgba>,
    dpi: u32,
    antialias: bool,
    metatile_size: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new(TileFormat::default())
    }
}

impl RenderOptions {
    pub fn new(format: TileFormat) -> Self {
        Self {
            format,
            background: None,
            dpi: DEFAULT_DPI,
            antialias: true,
            metatile_size: DEFAULT_METATILE_SIZE,
        }
    }

    pub fn with_background(mut self, background: Option<Rgba>) -> Self {
        self.background = background;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    /// Sets the meta-tile multiplier, clamped to `1..=MAX_METATILE_SIZE`.
    pub fn with_metatile_size(mut self, metatile_size: u32) -> Self {
        self.metatile_size = metatile_size.clamp(1, MAX_METATILE_SIZE);
        self
    }

    pub fn format(&self) -> TileFormat {
        self.format
    }

    pub fn background(&self) -> Option<Rgba> {
        self.background
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn antialias(&self) -> bool {
        self.antialias
    }

    pub fn metatile_size(&self) -> u32 {
        self.metatile_size
    }

    pub fn render_size(&self) -> u32 {
        render_size(self.metatile_size)
    }

    /// Pixels of buffer rendered on each side of the tile.
    pub fn buffer_pixels(&self) -> u32 {
        (self.render_size() - TILE_SIZE) / 2
    }

    /// Colour the canvas starts with.
    ///
    /// Transparent for alpha-capable formats without an explicit
    /// background, opaque white for the others.
    pub fn canvas_background(&self) -> Rgba {
        match self.background {
            Some(color) => color,
            None if self.format.supports_alpha() => Rgba::TRANSPARENT,
            None => Rgba::WHITE,
        }
    }
}
