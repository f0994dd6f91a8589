//! Tileset metadata written to the `metadata` table.

use crate::coord::{GeoBounds, ZoomRange};
use crate::encode::TileFormat;

/// Default tileset name.
pub const DEFAULT_NAME: &str = "Shaped Export";

/// Default tileset description.
pub const DEFAULT_DESCRIPTION: &str = "Generated by shapedtiles";

const TILESET_TYPE: &str = "baselayer";
const TILESET_VERSION: &str = "1.0";

/// Descriptive metadata for one archive.
///
/// # Example
///
/// ```
/// use shapedtiles::coord::{GeoBounds, ZoomRange};
/// use shapedtiles::encode::TileFormat;
/// use shapedtiles::mbtiles::TilesetMetadata;
///
/// let metadata = TilesetMetadata::new(TileFormat::Png, ZoomRange::new(10, 14).unwrap())
///     .with_bounds(GeoBounds { lon_min: -1.0, lat_min: 50.0, lon_max: 1.0, lat_max: 52.0 });
///
/// let entries = metadata.entries();
/// assert!(entries.contains(&("center", "0,51,12".to_string())));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TilesetMetadata {
    pub name: String,
    pub description: String,
    pub format: TileFormat,
    pub zooms: ZoomRange,
    pub bounds: Option<GeoBounds>,
}

impl TilesetMetadata {
    pub fn new(format: TileFormat, zooms: ZoomRange) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            format,
            zooms,
            bounds: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_bounds(mut self, bounds: GeoBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Key/value rows for the `metadata` table.
    ///
    /// `bounds` and `center` are only present when bounds are known. The
    /// center is the bbox midpoint at the integer-averaged zoom.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = vec![
            ("name", self.name.clone()),
            ("type", TILESET_TYPE.to_string()),
            ("version", TILESET_VERSION.to_string()),
            ("description", self.description.clone()),
            ("format", self.format.metadata_name().to_string()),
            ("minzoom", self.zooms.min().to_string()),
            ("maxzoom", self.zooms.max().to_string()),
        ];

        if let Some(bounds) = &self.bounds {
            entries.push((
                "bounds",
                format!(
                    "{},{},{},{}",
                    bounds.lon_min, bounds.lat_min, bounds.lon_max, bounds.lat_max
                ),
            ));
            let center = bounds.center();
            entries.push((
                "center",
                format!("{},{},{}", center.lon, center.lat, self.zooms.midpoint()),
            ));
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(entries: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_required_keys_without_bounds() {
        let metadata = TilesetMetadata::new(TileFormat::Jpeg, ZoomRange::new(3, 7).unwrap());
        let entries = metadata.entries();

        assert_eq!(lookup(&entries, "name"), Some(DEFAULT_NAME));
        assert_eq!(lookup(&entries, "type"), Some("baselayer"));
        assert_eq!(lookup(&entries, "version"), Some("1.0"));
        assert_eq!(lookup(&entries, "format"), Some("jpg"));
        assert_eq!(lookup(&entries, "minzoom"), Some("3"));
        assert_eq!(lookup(&entries, "maxzoom"), Some("7"));
        assert_eq!(lookup(&entries, "bounds"), None);
        assert_eq!(lookup(&entries, "center"), None);
    }

    #[test]
    fn test_bounds_and_center() {
        let metadata = TilesetMetadata::new(TileFormat::Png, ZoomRange::new(3, 6).unwrap())
            .with_name("Lakes")
            .with_bounds(GeoBounds {
                lon_min: -10.5,
                lat_min: 40.0,
                lon_max: 10.5,
                lat_max: 50.0,
            });
        let entries = metadata.entries();

        assert_eq!(lookup(&entries, "name"), Some("Lakes"));
        assert_eq!(lookup(&entries, "bounds"), Some("-10.5,40,10.5,50"));
        assert_eq!(lookup(&entries, "center"), Some("0,45,4"));
    }
}
