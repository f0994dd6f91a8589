//! Tile image encoding.
//!
//! Rendered tiles are RGBA images; this module turns them into the bytes
//! stored in the archive.

mod encoder;
mod error;

pub use encoder::{ImageTileEncoder, TileEncoder};
pub use error::EncodeError;

use std::fmt;
use std::str::FromStr;

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Stored tile image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileFormat {
    #[default]
    Png,
    Jpeg,
}

impl TileFormat {
    /// Value of the `format` metadata key.
    pub fn metadata_name(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpeg => "jpg",
        }
    }

    /// Whether the format can store a transparent background.
    pub fn supports_alpha(&self) -> bool {
        matches!(self, TileFormat::Png)
    }
}

impl fmt::Display for TileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileFormat::Png => write!(f, "PNG"),
            TileFormat::Jpeg => write!(f, "JPEG"),
        }
    }
}

impl FromStr for TileFormat {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(TileFormat::Png),
            "jpg" | "jpeg" => Ok(TileFormat::Jpeg),
            other => Err(EncodeError::UnknownFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("png".parse::<TileFormat>().unwrap(), TileFormat::Png);
        assert_eq!("JPEG".parse::<TileFormat>().unwrap(), TileFormat::Jpeg);
        assert_eq!(" jpg ".parse::<TileFormat>().unwrap(), TileFormat::Jpeg);
        assert!("webp".parse::<TileFormat>().is_err());
    }

    #[test]
    fn test_alpha_support() {
        assert!(TileFormat::Png.supports_alpha());
        assert!(!TileFormat::Jpeg.supports_alpha());
    }
}
