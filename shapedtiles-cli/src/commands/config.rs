//! Configuration management CLI commands.
//!
//! Provides `config path`, `config init` and `config show`.

use clap::Subcommand;
use shapedtiles::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Write a commented configuration file with default values
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration (file values over defaults)
    Show,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Init { force } => run_init(force),
        ConfigCommands::Show => run_show(),
    }
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    let path = config_file_path();
    println!("{}", path.display());
    if !path.exists() {
        println!("(file does not exist yet; run 'shapedtiles config init')");
    }
    Ok(())
}

fn run_init(force: bool) -> Result<(), CliError> {
    let path = config_file_path();
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use --force to overwrite it with defaults.",
            path.display()
        )));
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn run_show() -> Result<(), CliError> {
    let path = config_file_path();
    let config = ConfigFile::load()?;

    println!("Configuration Settings");
    println!("======================");
    if path.exists() {
        println!("Source: {}", path.display());
    } else {
        println!("Source: built-in defaults ({} not found)", path.display());
    }
    println!();

    println!("[zoom]");
    println!("  min = {}", config.zoom.min);
    println!("  max = {}", config.zoom.max);
    println!();
    println!("[render]");
    println!("  dpi = {}", config.render.dpi);
    println!("  format = {}", config.render.format.metadata_name());
    println!("  jpeg_quality = {}", config.render.jpeg_quality);
    println!("  metatile_size = {}", config.render.metatile_size);
    println!("  antialias = {}", config.render.antialias);
    match config.render.background {
        Some(colour) => println!("  background = {}", colour),
        None => println!("  background = (none)"),
    }
    println!();
    println!("[archive]");
    println!("  name = {}", config.archive.name);
    println!("  description = {}", config.archive.description);
    println!("  commit_interval = {}", config.archive.commit_interval);
    println!();
    println!("[logging]");
    println!("  directory = {}", config.logging.directory.display());
    println!("  file = {}", config.logging.file);

    Ok(())
}
