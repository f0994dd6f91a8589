//! Tiles command - list the tiles a polygon covers.

use std::io::{self, BufWriter, Write};

use clap::Args;
use shapedtiles::coord::tile_row_tms;
use shapedtiles::filter::intersecting_tiles;

use super::common::AreaArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the tiles command.
#[derive(Debug, Args)]
pub struct TilesArgs {
    #[command(flatten)]
    pub area: AreaArgs,

    /// Print rows in TMS order (origin bottom-left), as stored in MBTiles
    #[arg(long)]
    pub tms: bool,
}

/// Run the tiles command.
///
/// Prints one `z/x/y` line per tile, in generation order.
pub fn run(args: TilesArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("tiles");

    let shape = args.area.load_polygon()?;
    let zooms = args.area.zoom_range(runner.config())?;
    let tiles = intersecting_tiles(&shape, zooms);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for tile in tiles.iter() {
        let row = if args.tms {
            tile_row_tms(tile.zoom, tile.y)
        } else {
            tile.y
        };
        // A closed pipe (e.g. `| head`) is not an error worth reporting
        if writeln!(out, "{}/{}/{}", tile.zoom, tile.x, row).is_err() {
            return Ok(());
        }
    }
    let _ = out.flush();

    Ok(())
}
