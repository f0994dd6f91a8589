//! shapedtiles CLI - Command-line interface
//!
//! This binary provides a command-line interface to the shapedtiles library.

mod commands;
mod error;
mod runner;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::estimate::EstimateArgs;
use commands::generate::GenerateArgs;
use commands::inspect::InspectArgs;
use commands::tiles::TilesArgs;

#[derive(Parser)]
#[command(name = "shapedtiles")]
#[command(version)]
#[command(about = "Generate MBTiles tile pyramids clipped to a polygon", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every tile overlapping a polygon into an MBTiles archive
    Generate(GenerateArgs),

    /// Estimate how many tiles a polygon covers
    Estimate(EstimateArgs),

    /// List the tiles a polygon covers as z/x/y
    Tiles(TilesArgs),

    /// Show metadata and tile counts of an MBTiles archive
    Inspect(InspectArgs),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args, cli.verbose),
        Commands::Estimate(args) => commands::estimate::run(args, cli.verbose),
        Commands::Tiles(args) => commands::tiles::run(args, cli.verbose),
        Commands::Inspect(args) => commands::inspect::run(args),
        Commands::Config(command) => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_arguments() {
        let cli = Cli::try_parse_from([
            "shapedtiles",
            "generate",
            "area.geojson",
            "-o",
            "out",
            "--min-zoom",
            "6",
            "--format",
            "jpeg",
            "--background",
            "#102030",
        ])
        .unwrap();

        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.area.min_zoom, Some(6));
        assert_eq!(args.area.max_zoom, None);
        assert_eq!(args.format, Some(commands::common::FormatArg::Jpeg));
        assert_eq!(
            args.background,
            Some(shapedtiles::render::Rgba::opaque(0x10, 0x20, 0x30))
        );
    }

    #[test]
    fn test_zoom_above_limit_is_rejected() {
        let result = Cli::try_parse_from(["shapedtiles", "tiles", "area.geojson", "--max-zoom", "23"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quality_range_is_enforced() {
        let result = Cli::try_parse_from([
            "shapedtiles",
            "generate",
            "area.geojson",
            "-o",
            "out",
            "--quality",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::try_parse_from(["shapedtiles", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigCommands::Init { force: true })
        ));
    }
}
