//! Clipped tile rendering.
//!
//! [`ShapedTileRenderer`] asks a [`MapRenderer`] to draw a meta-tile around
//! each tile, composites the result onto the background through a mask built
//! from the polygon, and crops the centre back to a single tile:
//!
//! ```text
//! tile ──► contains? ──yes──► render, no mask ────────────┐
//!             │                                            │
//!             no ──► clip polygon to render extent         ├──► crop 256x256
//!                        │                                 │
//!                        ├── empty ──► background only ────┤
//!                        └── mask ───► render through mask ┘
//! ```

mod clip;
mod error;
mod graticule;
mod options;
mod renderer;
mod tile;

pub use clip::ClipKind;
pub use error::RenderError;
pub use graticule::GraticuleRenderer;
pub use options::{
    estimate_render_memory_mb, render_size, RenderOptions, Rgba, DEFAULT_DPI,
    DEFAULT_METATILE_SIZE, MAX_DPI, MAX_METATILE_SIZE, MAX_RENDER_PIXELS, MEMORY_WARNING_MB,
    MIN_DPI,
};
pub use renderer::{MapRenderer, RenderRequest};
pub use tile::{RenderedTile, ShapedTileRenderer};
