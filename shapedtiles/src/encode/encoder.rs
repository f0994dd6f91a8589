//! Encoder trait and the `image`-backed implementation.

use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder, RgbaImage};

use super::{EncodeError, TileFormat, DEFAULT_JPEG_QUALITY};

/// Turns a rendered tile into archive bytes.
///
/// Implementations must be `Send + Sync` so a generator can be moved onto
/// whichever thread drives it.
pub trait TileEncoder: Send + Sync {
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, EncodeError>;

    /// Output format, also written to the archive metadata.
    fn format(&self) -> TileFormat;

    /// Human-readable encoder name for logs.
    fn name(&self) -> &str;
}

impl<T: TileEncoder + ?Sized> TileEncoder for Arc<T> {
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
        (**self).encode(image)
    }

    fn format(&self) -> TileFormat {
        (**self).format()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// PNG/JPEG encoder built on the `image` crate.
///
/// PNG output keeps the alpha channel. JPEG output drops it, so callers
/// should render JPEG tiles onto an opaque background.
#[derive(Debug, Clone)]
pub struct ImageTileEncoder {
    format: TileFormat,
    quality: u8,
    name: String,
}

impl ImageTileEncoder {
    pub fn new(format: TileFormat) -> Self {
        Self {
            format,
            quality: DEFAULT_JPEG_QUALITY,
            name: Self::describe(format, DEFAULT_JPEG_QUALITY),
        }
    }

    /// Sets the JPEG quality (1-100). Ignored for PNG.
    pub fn with_quality(mut self, quality: u8) -> Result<Self, EncodeError> {
        if !(1..=100).contains(&quality) {
            return Err(EncodeError::InvalidQuality(quality));
        }
        self.quality = quality;
        self.name = Self::describe(self.format, quality);
        Ok(self)
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    fn describe(format: TileFormat, quality: u8) -> String {
        match format {
            TileFormat::Png => "PNG".to_string(),
            TileFormat::Jpeg => format!("JPEG q{}", quality),
        }
    }
}

impl TileEncoder for ImageTileEncoder {
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Cursor::new(Vec::new());
        match self.format {
            TileFormat::Png => {
                PngEncoder::new(&mut buf).write_image(
                    image.as_raw(),
                    image.width(),
                    image.height(),
                    image::ExtendedColorType::Rgba8,
                )?;
            }
            TileFormat::Jpeg => {
                let rgb = DynamicImage::ImageRgba8(image.clone()).into_rgb8();
                JpegEncoder::new_with_quality(&mut buf, self.quality).write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    image::ExtendedColorType::Rgb8,
                )?;
            }
        }
        Ok(buf.into_inner())
    }

    fn format(&self) -> TileFormat {
        self.format
    }

    fn name(&self) -> &str {
        &self.name
    }
}
