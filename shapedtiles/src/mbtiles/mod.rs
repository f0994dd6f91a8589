//! MBTiles archive access.
//!
//! An MBTiles file is a SQLite database with two tables:
//!
//! ```sql
//! CREATE TABLE tiles (zoom_level INTEGER, tile_column INTEGER, tile_row INTEGER,
//!                     tile_data BLOB, PRIMARY KEY (zoom_level, tile_column, tile_row));
//! CREATE TABLE metadata (name TEXT PRIMARY KEY, value TEXT);
//! ```
//!
//! Rows are numbered from the bottom of the pyramid, the reverse of the XYZ
//! convention used everywhere else in this crate. [`MbtilesWriter`] and
//! [`MbtilesReader`] both take XYZ [`TileIndex`](crate::coord::TileIndex)
//! values and flip the row internally.

mod error;
mod metadata;
mod reader;
mod writer;

pub use error::MbtilesError;
pub use metadata::{TilesetMetadata, DEFAULT_DESCRIPTION, DEFAULT_NAME};
pub use reader::MbtilesReader;
pub use writer::MbtilesWriter;

/// File extension for MBTiles archives.
pub const MBTILES_EXTENSION: &str = "mbtiles";

pub(crate) const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS tiles (
        zoom_level INTEGER,
        tile_column INTEGER,
        tile_row INTEGER,
        tile_data BLOB,
        PRIMARY KEY (zoom_level, tile_column, tile_row)
    );
    CREATE TABLE IF NOT EXISTS metadata (
        name TEXT PRIMARY KEY,
        value TEXT
    );
";
