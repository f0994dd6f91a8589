//! Generate command - render a polygon's tiles into an MBTiles archive.

use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use shapedtiles::filter::TileEstimate;
use shapedtiles::generator::{
    GenerationObserver, GenerationOutcome, GenerationSettings, GenerationState,
    ProgressUpdate, TileGenerator, TracingObserver,
};
use shapedtiles::render::{estimate_render_memory_mb, GraticuleRenderer, Rgba, MEMORY_WARNING_MB};
use tracing::{info, warn};

use super::common::{AreaArgs, FormatArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Minimum time between two redraws of the progress line.
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Arguments for the generate command.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub area: AreaArgs,

    /// Output archive (".mbtiles" is appended if missing)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Tile image format (default from config, png)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// JPEG quality, 1-100
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Map scale in dots per inch
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Meta-tile size (1-16); larger keeps more context around tile edges
    #[arg(long)]
    pub metatile: Option<u32>,

    /// Background colour outside the polygon, e.g. "#ffffff"
    #[arg(long)]
    pub background: Option<Rgba>,

    /// Disable antialiasing
    #[arg(long)]
    pub no_antialias: bool,

    /// Tileset name stored in the archive metadata
    #[arg(long)]
    pub name: Option<String>,

    /// Tileset description stored in the archive metadata
    #[arg(long)]
    pub description: Option<String>,

    /// Tiles written between database commits
    #[arg(long)]
    pub commit_interval: Option<usize>,

    /// Graticule spacing in degrees (chosen per tile when omitted)
    #[arg(long)]
    pub grid: Option<f64>,
}

/// Run the generate command.
pub fn run(args: GenerateArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("generate");
    let config = runner.config();

    let shape = args.area.load_polygon()?;
    let (min_zoom, max_zoom) = args.area.zoom_bounds(config);

    // Config first, then CLI overrides
    let mut builder = config
        .apply_to(GenerationSettings::builder(shape, args.output))
        .zoom(min_zoom, max_zoom);
    if let Some(format) = args.format {
        builder = builder.format(format.into());
    }
    if let Some(quality) = args.quality {
        builder = builder.jpeg_quality(quality);
    }
    if let Some(dpi) = args.dpi {
        builder = builder.dpi(dpi);
    }
    if let Some(metatile) = args.metatile {
        builder = builder.metatile_size(metatile);
    }
    if args.background.is_some() {
        builder = builder.background(args.background);
    }
    if args.no_antialias {
        builder = builder.antialias(false);
    }
    if let Some(name) = args.name {
        builder = builder.name(name);
    }
    if let Some(description) = args.description {
        builder = builder.description(description);
    }
    if let Some(interval) = args.commit_interval {
        builder = builder.commit_interval(interval);
    }
    let settings = builder.build()?;

    print_summary(&settings);

    let mut renderer = GraticuleRenderer::new();
    if let Some(spacing) = args.grid {
        renderer = renderer.with_spacing(spacing);
    }
    let mut generator = TileGenerator::new(settings, renderer, ConsoleProgress::new());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let outcome = runtime.block_on(async {
        let token = generator.cancel_token();
        let signal = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping after the current tile");
                token.cancel();
            }
        });
        let result = shapedtiles::generator::run(&mut generator).await;
        signal.abort();
        result
    })?;

    report(&outcome, generator.settings())
}

fn print_summary(settings: &GenerationSettings) {
    let estimate = TileEstimate {
        count: settings.total_tiles() as u64,
        exact: true,
    };
    let render = settings.render_options();

    println!("shapedtiles v{}", shapedtiles::VERSION);
    println!();
    println!("Output:   {}", settings.output().display());
    println!(
        "Zoom:     {} - {}",
        settings.zooms().min(),
        settings.zooms().max()
    );
    println!("Tiles:    {}", estimate.label());
    println!(
        "Format:   {}  DPI: {}  Meta-tile: {}x{}",
        settings.format(),
        render.dpi(),
        render.metatile_size(),
        render.metatile_size()
    );

    let memory = estimate_render_memory_mb(render.metatile_size());
    if memory > MEMORY_WARNING_MB {
        warn!(memory_mb = memory, "Large render buffer");
        println!(
            "Warning:  each tile renders into ~{:.0} MB; consider a smaller --metatile",
            memory
        );
    }
    println!();
    println!("Press Ctrl+C to stop; tiles written so far are kept.");
    println!();
}

fn report(outcome: &GenerationOutcome, settings: &GenerationSettings) -> Result<(), CliError> {
    match outcome.state {
        GenerationState::Completed => {
            println!(
                "✓ {} in {:.1}s: {}",
                outcome.message,
                outcome.elapsed.as_secs_f64(),
                settings.output().display()
            );
            Ok(())
        }
        GenerationState::Cancelled => {
            println!(
                "{} after {}/{} tiles; partial archive kept at {}",
                outcome.message,
                outcome.tiles_written,
                outcome.total_tiles,
                settings.output().display()
            );
            Ok(())
        }
        _ => Err(CliError::GenerationFailed(outcome.message.clone())),
    }
}

/// Draws a single updating progress line on stdout and forwards
/// everything to the tracing log.
struct ConsoleProgress {
    log: TracingObserver,
    last_draw: Option<Instant>,
}

impl ConsoleProgress {
    fn new() -> Self {
        Self {
            log: TracingObserver::default(),
            last_draw: None,
        }
    }
}

impl GenerationObserver for ConsoleProgress {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        self.log.on_progress(update);

        let now = Instant::now();
        let due = match self.last_draw {
            Some(last) => now.duration_since(last) >= REDRAW_INTERVAL,
            None => true,
        };
        if due || update.completed == update.total {
            self.last_draw = Some(now);
            let mut stdout = std::io::stdout();
            let _ = write!(stdout, "\r{:5.1}%  {}\x1b[K", update.percent(), update.label());
            let _ = stdout.flush();
        }
    }

    fn on_finished(&mut self, outcome: &GenerationOutcome) {
        self.log.on_finished(outcome);
        if self.last_draw.is_some() {
            println!();
        }
    }
}
