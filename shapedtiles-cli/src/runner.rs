//! CLI runner for common setup.
//!
//! Encapsulates config loading and logging initialization so each command
//! handler starts the same way.

use crate::error::CliError;
use tracing::info;
use shapedtiles::config::ConfigFile;
use shapedtiles::logging::{init_logging, LoggingGuard};

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `verbose` - When true, defaults to debug-level logging if RUST_LOG is unset
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let logging_guard =
            init_logging(&config.logging.directory, &config.logging.file, verbose)
                .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("shapedtiles v{}", shapedtiles::VERSION);
        info!(
            log_file = %self.logging_guard.log_path().display(),
            "shapedtiles CLI: {} command", command
        );
    }
}
