//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;
use shapedtiles::config::ConfigFileError;
use shapedtiles::generator::GenerationError;
use shapedtiles::mbtiles::MbtilesError;
use shapedtiles::shape::ShapeError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to read an input file
    FileRead { path: PathBuf, error: std::io::Error },
    /// Polygon file could not be parsed
    Shape { path: PathBuf, error: ShapeError },
    /// Settings were rejected or the run could not start
    Generation(GenerationError),
    /// Generation ran but ended in failure
    GenerationFailed(String),
    /// Failed to read an archive
    Archive(MbtilesError),
    /// Failed to start the async runtime
    Runtime(std::io::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Shape { .. } => {
                eprintln!();
                eprintln!("The input must be a GeoJSON Polygon, MultiPolygon, Feature or");
                eprintln!("FeatureCollection with longitude/latitude coordinates.");
            }
            CliError::Generation(GenerationError::EmptyTileSet { .. }) => {
                eprintln!();
                eprintln!("Check that the polygon lies between latitudes -85 and 85,");
                eprintln!("or try a higher --max-zoom for very small areas.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::FileRead { path, error } => {
                write!(f, "Failed to read file '{}': {}", path.display(), error)
            }
            CliError::Shape { path, error } => {
                write!(f, "Invalid polygon in '{}': {}", path.display(), error)
            }
            CliError::Generation(e) => write!(f, "{}", e),
            CliError::GenerationFailed(msg) => write!(f, "Generation failed: {}", msg),
            CliError::Archive(e) => write!(f, "Failed to read archive: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::FileRead { error, .. } => Some(error),
            CliError::Shape { error, .. } => Some(error),
            CliError::Generation(e) => Some(e),
            CliError::Archive(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<GenerationError> for CliError {
    fn from(e: GenerationError) -> Self {
        CliError::Generation(e)
    }
}

impl From<MbtilesError> for CliError {
    fn from(e: MbtilesError) -> Self {
        CliError::Archive(e)
    }
}
