//! shapedtiles - MBTiles tile pyramids clipped to a polygon
//!
//! This library renders every Web Mercator tile that overlaps a polygon,
//! masks away whatever falls outside the polygon, and stores the encoded
//! images in an MBTiles archive.
//!
//! # High-Level API
//!
//! The [`generator`] module drives a whole run:
//!
//! ```no_run
//! use shapedtiles::generator::{run_blocking, GenerationSettings, TileGenerator, TracingObserver};
//! use shapedtiles::render::GraticuleRenderer;
//! use shapedtiles::shape::{CoordFrame, ShapePolygon};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let shape = ShapePolygon::from_ring(
//!     &[(5.0, 45.0), (10.0, 45.0), (10.0, 48.0), (5.0, 48.0)],
//!     CoordFrame::Geographic,
//! )?;
//! let settings = GenerationSettings::builder(shape, "alps.mbtiles")
//!     .zoom(6, 9)
//!     .build()?;
//!
//! let mut generator =
//!     TileGenerator::new(settings, GraticuleRenderer::default(), TracingObserver::default());
//! let outcome = run_blocking(&mut generator)?;
//! println!("{}", outcome.message);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coord;
pub mod encode;
pub mod filter;
pub mod generator;
pub mod logging;
pub mod mbtiles;
pub mod render;
pub mod shape;

/// Version of the shapedtiles library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
