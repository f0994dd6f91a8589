//! Tile generation.
//!
//! A run is described by [`GenerationSettings`] and executed by a
//! [`TileGenerator`], one tile per step:
//!
//! ```text
//! GenerationSettings ──► TileGenerator::start ──► step ──► step ──► ... ──► GenerationOutcome
//!                              │                   │
//!                              ▼                   ├── render (ShapedTileRenderer)
//!                        MbtilesWriter::open       ├── encode (ImageTileEncoder)
//!                                                  └── write, commit every N tiles
//! ```
//!
//! # Example
//!
//! ```no_run
//! use shapedtiles::generator::{run_blocking, GenerationSettings, TileGenerator, TracingObserver};
//! use shapedtiles::render::GraticuleRenderer;
//! use shapedtiles::shape::ShapePolygon;
//!
//! let shape = ShapePolygon::from_geojson_str(&std::fs::read_to_string("area.geojson")?)?;
//! let settings = GenerationSettings::builder(shape, "area.mbtiles")
//!     .zoom(8, 12)
//!     .build()?;
//!
//! let mut generator = TileGenerator::new(settings, GraticuleRenderer::new(), TracingObserver::default());
//! let outcome = run_blocking(&mut generator)?;
//! println!("{}", outcome.message);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod driver;
mod error;
mod pipeline;
mod progress;
mod settings;

pub use driver::{run, run_blocking};
pub use error::GenerationError;
pub use pipeline::{GenerationOutcome, GenerationState, StepOutcome, TileGenerator};
pub use progress::{
    format_eta, GenerationObserver, GenerationProgress, NoopObserver, ProgressUpdate,
    TracingObserver,
};
pub use settings::{
    with_mbtiles_extension, GenerationSettings, GenerationSettingsBuilder,
    DEFAULT_COMMIT_INTERVAL, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM,
};
