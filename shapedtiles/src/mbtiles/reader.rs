//! Read-only archive access, used by `inspect` and by tests.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use super::MbtilesError;
use crate::coord::{tile_row_tms, TileIndex};

/// Read-only view of an MBTiles archive.
#[derive(Debug)]
pub struct MbtilesReader {
    conn: Connection,
}

impl MbtilesReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MbtilesError> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
            |source| MbtilesError::Open {
                path: path.to_path_buf(),
                source,
            },
        )?;
        Ok(Self { conn })
    }

    /// All metadata rows, sorted by key.
    pub fn metadata(&self) -> Result<BTreeMap<String, String>, MbtilesError> {
        let mut stmt = self.conn.prepare("SELECT name, value FROM metadata")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut metadata = BTreeMap::new();
        for row in rows {
            let (name, value): (String, String) = row?;
            metadata.insert(name, value);
        }
        Ok(metadata)
    }

    pub fn tile_count(&self) -> Result<u64, MbtilesError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tiles", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Tile counts grouped by zoom level.
    pub fn tile_count_by_zoom(&self) -> Result<BTreeMap<u8, u64>, MbtilesError> {
        let mut stmt = self
            .conn
            .prepare("SELECT zoom_level, COUNT(*) FROM tiles GROUP BY zoom_level")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, u8>(0)?, row.get::<_, i64>(1)?)))?;
        let mut counts = BTreeMap::new();
        for row in rows {
            let (zoom, count) = row?;
            counts.insert(zoom, count.max(0) as u64);
        }
        Ok(counts)
    }

    /// Reads a tile by its XYZ index.
    pub fn read_tile(&self, tile: TileIndex) -> Result<Option<Vec<u8>>, MbtilesError> {
        self.read_stored(tile.zoom, tile.x, tile_row_tms(tile.zoom, tile.y))
    }

    /// Reads a tile by its stored (bottom-origin) row.
    pub fn read_stored(
        &self,
        zoom: u8,
        column: u32,
        stored_row: u32,
    ) -> Result<Option<Vec<u8>>, MbtilesError> {
        let data = self
            .conn
            .query_row(
                "SELECT tile_data FROM tiles WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3",
                params![zoom, column, stored_row],
                |row| row.get(0),
            )
            .optional()?;
        Ok(data)
    }
}
