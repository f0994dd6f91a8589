use thiserror::Error;

/// Errors raised while encoding a tile image.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("unknown tile format '{0}' (expected png or jpeg)")]
    UnknownFormat(String),

    #[error("JPEG quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}
