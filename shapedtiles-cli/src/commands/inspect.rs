//! Inspect command - show an archive's metadata and tile counts.

use std::path::PathBuf;

use clap::Args;
use shapedtiles::filter::format_count;
use shapedtiles::mbtiles::MbtilesReader;

use crate::error::CliError;

/// Arguments for the inspect command.
#[derive(Debug, Args)]
pub struct InspectArgs {
    /// MBTiles archive to inspect
    pub archive: PathBuf,
}

/// Run the inspect command.
pub fn run(args: InspectArgs) -> Result<(), CliError> {
    if !args.archive.exists() {
        return Err(CliError::FileRead {
            path: args.archive,
            error: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    }

    let reader = MbtilesReader::open(&args.archive)?;
    let metadata = reader.metadata()?;
    let by_zoom = reader.tile_count_by_zoom()?;
    let total = reader.tile_count()?;

    println!("{}", args.archive.display());
    println!();
    println!("Metadata");
    println!("--------");
    let width = metadata.keys().map(String::len).max().unwrap_or(0);
    for (key, value) in &metadata {
        println!("  {:width$}  {}", key, value, width = width);
    }

    println!();
    println!("Tiles");
    println!("-----");
    for (zoom, count) in &by_zoom {
        println!("  Z{:<3} {:>12}", zoom, format_count(*count));
    }
    println!("  {:<4} {:>12}", "all", format_count(total));

    Ok(())
}
