//! Estimate command - preflight tile counts before generating.

use clap::Args;
use shapedtiles::filter::{
    candidate_ranges, estimate_tile_count, format_count, intersecting_tiles, EstimateSeverity,
    TileEstimate,
};
use shapedtiles::render::{
    estimate_render_memory_mb, render_size, MAX_METATILE_SIZE, MEMORY_WARNING_MB,
};

use super::common::AreaArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the estimate command.
#[derive(Debug, Args)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub area: AreaArgs,

    /// Count only tiles that actually overlap the polygon (slower)
    #[arg(long)]
    pub exact: bool,

    /// Meta-tile size used for the memory estimate (default from config)
    #[arg(long)]
    pub metatile: Option<u32>,
}

/// Run the estimate command.
pub fn run(args: EstimateArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("estimate");
    let config = runner.config();

    let shape = args.area.load_polygon()?;
    let zooms = args.area.zoom_range(config)?;
    let metatile = args
        .metatile
        .unwrap_or(config.render.metatile_size)
        .clamp(1, MAX_METATILE_SIZE);

    println!("Tile estimate for {}", args.area.polygon.display());
    println!();

    let ranges = candidate_ranges(&shape, zooms);
    let estimate = if args.exact {
        let tiles = intersecting_tiles(&shape, zooms);
        let exact_counts = tiles.per_zoom_counts();
        println!("{:>6}  {:>14}  {:>14}", "Zoom", "Bounding box", "Overlapping");
        for range in &ranges {
            let exact = exact_counts.get(&range.zoom).copied().unwrap_or(0);
            println!(
                "{:>6}  {:>14}  {:>14}",
                range.zoom,
                format_count(range.count()),
                format_count(exact as u64)
            );
        }
        TileEstimate {
            count: tiles.len() as u64,
            exact: true,
        }
    } else {
        println!("{:>6}  {:>14}", "Zoom", "Bounding box");
        for range in &ranges {
            println!("{:>6}  {:>14}", range.zoom, format_count(range.count()));
        }
        estimate_tile_count(&shape, zooms)
    };

    println!();
    println!("Total:  {}", estimate.label());
    match estimate.severity() {
        EstimateSeverity::Low => {}
        EstimateSeverity::Medium => println!("Note:   this will take a while."),
        EstimateSeverity::High => {
            println!("Note:   very large job; consider a smaller zoom range.")
        }
    }

    let memory = estimate_render_memory_mb(metatile);
    let size = render_size(metatile);
    println!(
        "Memory: ~{:.0} MB per tile ({}x{} px render at meta-tile {})",
        memory, size, size, metatile
    );
    if memory > MEMORY_WARNING_MB {
        println!(
            "Warning: render buffers above {:.0} MB may exhaust memory; use a smaller --metatile",
            MEMORY_WARNING_MB
        );
    }

    Ok(())
}
