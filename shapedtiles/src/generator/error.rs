//! Error types for tile generation.

use thiserror::Error;

use super::GenerationState;
use crate::coord::TileIndex;
use crate::encode::EncodeError;
use crate::mbtiles::MbtilesError;
use crate::render::RenderError;

/// Errors raised while configuring or running a generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Minimum zoom above maximum zoom; rejected before any tile math
    #[error("invalid zoom range: minimum zoom ({min}) cannot be greater than maximum zoom ({max})")]
    InvalidZoomRange { min: u8, max: u8 },

    /// A setting is outside its allowed range
    #[error("invalid {setting}: {reason}")]
    InvalidSetting {
        setting: &'static str,
        reason: String,
    },

    /// The polygon overlaps no tile in the zoom range
    #[error("polygon does not intersect any tile between zoom {min_zoom} and {max_zoom}")]
    EmptyTileSet { min_zoom: u8, max_zoom: u8 },

    #[error("render failed at tile {tile}: {source}")]
    Render {
        tile: TileIndex,
        #[source]
        source: RenderError,
    },

    #[error("encoding failed at tile {tile}: {source}")]
    Encode {
        tile: TileIndex,
        #[source]
        source: EncodeError,
    },

    /// Archive open, write, commit or close failed
    #[error("archive error: {0}")]
    Archive(#[from] MbtilesError),

    /// An operation was called in the wrong state
    #[error("generator is {actual}, expected {expected}")]
    InvalidState {
        expected: GenerationState,
        actual: GenerationState,
    },
}

impl GenerationError {
    /// The tile being processed when the error occurred, if any.
    pub fn tile(&self) -> Option<TileIndex> {
        match self {
            GenerationError::Render { tile, .. } | GenerationError::Encode { tile, .. } => {
                Some(*tile)
            }
            _ => None,
        }
    }
}
