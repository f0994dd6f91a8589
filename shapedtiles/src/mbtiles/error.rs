//! Error types for archive access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing an MBTiles archive.
#[derive(Debug, Error)]
pub enum MbtilesError {
    /// The database file could not be opened or created
    #[error("failed to open archive '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        source: rusqlite::Error,
    },

    /// A statement failed
    #[error("archive database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The writer was used after `close`
    #[error("archive is already closed")]
    Closed,
}
