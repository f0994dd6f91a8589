//! Batched MBTiles writer.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};
use tracing::{debug, warn};

use super::{MbtilesError, TilesetMetadata, SCHEMA};
use crate::coord::{tile_row_tms, TileIndex};

const UPSERT_TILE: &str = "INSERT OR REPLACE INTO tiles (zoom_level, tile_column, tile_row, tile_data) \
                           VALUES (?1, ?2, ?3, ?4)";
const UPSERT_METADATA: &str = "INSERT OR REPLACE INTO metadata (name, value) VALUES (?1, ?2)";

/// Exclusive owner of an archive connection for one generation run.
///
/// Tile writes are grouped into explicit transactions: the first
/// [`write_tile`](Self::write_tile) after a commit opens one and
/// [`commit`](Self::commit) ends it. [`close`](Self::close) commits whatever
/// is pending and releases the connection; it may be called any number of
/// times.
#[derive(Debug)]
pub struct MbtilesWriter {
    path: PathBuf,
    conn: Option<Connection>,
    pending: usize,
    written: u64,
}

impl MbtilesWriter {
    /// Opens (or creates) the archive at `path`, creates the schema and
    /// upserts `metadata`.
    ///
    /// Reopening an existing archive keeps its tiles.
    pub fn open(path: impl AsRef<Path>, metadata: &TilesetMetadata) -> Result<Self, MbtilesError> {
        let path = path.as_ref().to_path_buf();
        let mut conn = Connection::open(&path).map_err(|source| MbtilesError::Open {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch(SCHEMA)?;

        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(UPSERT_METADATA)?;
            for (name, value) in metadata.entries() {
                stmt.execute(params![name, value])?;
            }
        }
        tx.commit()?;

        debug!(path = %path.display(), "Opened MBTiles archive");

        Ok(Self {
            path,
            conn: Some(conn),
            pending: 0,
            written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tiles written but not yet committed.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Total `write_tile` calls on this writer.
    pub fn tiles_written(&self) -> u64 {
        self.written
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Stores one encoded tile, replacing any previous data for the same
    /// index.
    ///
    /// `tile` uses XYZ rows; the stored row is `2^zoom - 1 - tile.y`.
    pub fn write_tile(&mut self, tile: TileIndex, data: &[u8]) -> Result<(), MbtilesError> {
        let conn = self.conn.as_ref().ok_or(MbtilesError::Closed)?;
        if conn.is_autocommit() {
            conn.execute_batch("BEGIN")?;
        }

        let stored_row = tile_row_tms(tile.zoom, tile.y);
        let mut stmt = conn.prepare_cached(UPSERT_TILE)?;
        stmt.execute(params![tile.zoom, tile.x, stored_row, data])?;

        self.pending += 1;
        self.written += 1;
        Ok(())
    }

    /// Commits pending tiles.
    pub fn commit(&mut self) -> Result<(), MbtilesError> {
        let conn = self.conn.as_ref().ok_or(MbtilesError::Closed)?;
        if !conn.is_autocommit() {
            conn.execute_batch("COMMIT")?;
            debug!(tiles = self.pending, "Committed tile batch");
        }
        self.pending = 0;
        Ok(())
    }

    /// Commits pending tiles and releases the connection.
    ///
    /// Idempotent. The connection is released even when the final commit
    /// fails; that error is still returned.
    pub fn close(&mut self) -> Result<(), MbtilesError> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        let commit_result = if conn.is_autocommit() {
            Ok(())
        } else {
            conn.execute_batch("COMMIT")
        };
        self.pending = 0;

        let close_result = conn.close().map_err(|(_, e)| e);
        debug!(path = %self.path.display(), tiles = self.written, "Closed MBTiles archive");

        commit_result?;
        close_result?;
        Ok(())
    }
}

impl Drop for MbtilesWriter {
    fn drop(&mut self) {
        if self.conn.is_some() {
            if let Err(e) = self.close() {
                warn!(path = %self.path.display(), error = %e, "Failed to close archive on drop");
            }
        }
    }
}
