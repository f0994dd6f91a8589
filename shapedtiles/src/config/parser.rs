//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::{config_directory, ConfigFileError};
use super::settings::ConfigFile;
use crate::coord::MAX_ZOOM;
use crate::encode::TileFormat;
use crate::render::{Rgba, MAX_DPI, MAX_METATILE_SIZE, MIN_DPI};

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [zoom] section
    if let Some(section) = ini.section(Some("zoom")) {
        if let Some(v) = section.get("min") {
            config.zoom.min = parse_zoom("min", v)?;
        }
        if let Some(v) = section.get("max") {
            config.zoom.max = parse_zoom("max", v)?;
        }
        if config.zoom.min > config.zoom.max {
            return Err(ConfigFileError::InvalidValue {
                section: "zoom".to_string(),
                key: "min".to_string(),
                value: config.zoom.min.to_string(),
                reason: format!("must not exceed max ({})", config.zoom.max),
            });
        }
    }

    // [render] section
    if let Some(section) = ini.section(Some("render")) {
        if let Some(v) = section.get("dpi") {
            let dpi: u32 = parse_number("render", "dpi", v)?;
            if !(MIN_DPI..=MAX_DPI).contains(&dpi) {
                return Err(invalid(
                    "render",
                    "dpi",
                    v,
                    format!("must be between {} and {}", MIN_DPI, MAX_DPI),
                ));
            }
            config.render.dpi = dpi;
        }
        if let Some(v) = section.get("format") {
            config.render.format = TileFormat::from_str(v)
                .map_err(|_| invalid("render", "format", v, "must be png or jpeg"))?;
        }
        if let Some(v) = section.get("jpeg_quality") {
            let quality: u8 = parse_number("render", "jpeg_quality", v)?;
            if !(1..=100).contains(&quality) {
                return Err(invalid(
                    "render",
                    "jpeg_quality",
                    v,
                    "must be between 1 and 100",
                ));
            }
            config.render.jpeg_quality = quality;
        }
        if let Some(v) = section.get("metatile_size") {
            let size: u32 = parse_number("render", "metatile_size", v)?;
            if !(1..=MAX_METATILE_SIZE).contains(&size) {
                return Err(invalid(
                    "render",
                    "metatile_size",
                    v,
                    format!("must be between 1 and {}", MAX_METATILE_SIZE),
                ));
            }
            config.render.metatile_size = size;
        }
        if let Some(v) = section.get("antialias") {
            config.render.antialias = parse_bool(v);
        }
        if let Some(v) = section.get("background") {
            let v = v.trim();
            config.render.background = if v.is_empty() {
                None
            } else {
                Some(Rgba::from_str(v).map_err(|_| {
                    invalid(
                        "render",
                        "background",
                        v,
                        "expected a hex colour like ffffff or 00000080",
                    )
                })?)
            };
        }
    }

    // [archive] section
    if let Some(section) = ini.section(Some("archive")) {
        if let Some(v) = section.get("name") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid("archive", "name", v, "must not be empty"));
            }
            config.archive.name = v.to_string();
        }
        if let Some(v) = section.get("description") {
            config.archive.description = v.trim().to_string();
        }
        if let Some(v) = section.get("commit_interval") {
            let interval: usize = parse_number("archive", "commit_interval", v)?;
            if interval == 0 {
                return Err(invalid(
                    "archive",
                    "commit_interval",
                    v,
                    "must be at least 1",
                ));
            }
            config.archive.commit_interval = interval;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                let path = expand_tilde(v);
                config.logging.directory = if path.is_relative() {
                    config_directory().join(path)
                } else {
                    path
                };
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn parse_zoom(key: &str, value: &str) -> Result<u8, ConfigFileError> {
    let zoom: u8 = parse_number("zoom", key, value)?;
    if zoom > MAX_ZOOM {
        return Err(invalid(
            "zoom",
            key,
            value,
            format!("must be between 0 and {}", MAX_ZOOM),
        ));
    }
    Ok(zoom)
}

fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a non-negative integer"))
}

fn invalid(section: &str, key: &str, value: &str, reason: impl Into<String>) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Parse a boolean value from a config string.
/// Accepts: true, false, 1, 0, yes, no, on, off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand a leading `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_partial_config() {
        let config = load(
            r#"
[zoom]
max = 16

[render]
format = jpg
"#,
        )
        .unwrap();

        assert_eq!(config.zoom.min, 10);
        assert_eq!(config.zoom.max, 16);
        assert_eq!(config.render.format, TileFormat::Jpeg);
        assert_eq!(config.render.dpi, 96);
        assert_eq!(config.archive.commit_interval, 100);
    }

    #[test]
    fn test_invalid_zoom_order() {
        let err = load(
            r#"
[zoom]
min = 12
max = 8
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("zoom.min"));
        assert!(err.to_string().contains("must not exceed max"));
    }

    #[test]
    fn test_zoom_out_of_range() {
        let err = load("[zoom]\nmax = 23\n").unwrap_err();
        assert!(err.to_string().contains("zoom.max"));
    }

    #[test]
    fn test_invalid_format() {
        let err = load("[render]\nformat = webp\n").unwrap_err();
        assert!(err.to_string().contains("must be png or jpeg"));
    }

    #[test]
    fn test_invalid_quality_and_dpi() {
        assert!(load("[render]\njpeg_quality = 0\n").is_err());
        assert!(load("[render]\njpeg_quality = abc\n").is_err());
        assert!(load("[render]\ndpi = 20\n").is_err());
        assert!(load("[render]\nmetatile_size = 17\n").is_err());
    }

    #[test]
    fn test_background_colour() {
        let config = load("[render]\nbackground = 336699\n").unwrap();
        assert_eq!(config.render.background, Some(Rgba::opaque(0x33, 0x66, 0x99)));

        let config = load("[render]\nbackground =\n").unwrap();
        assert_eq!(config.render.background, None);

        assert!(load("[render]\nbackground = blue\n").is_err());
    }

    #[test]
    fn test_zero_commit_interval_rejected() {
        let err = load("[archive]\ncommit_interval = 0\n").unwrap_err();
        assert!(err.to_string().contains("commit_interval"));
    }

    #[test]
    fn test_relative_log_directory_resolves_under_config_dir() {
        let config = load("[logging]\ndirectory = my-logs\n").unwrap();
        assert_eq!(config.logging.directory, config_directory().join("my-logs"));

        let config = load("[logging]\ndirectory = /var/log/tiles\n").unwrap();
        assert_eq!(config.logging.directory, PathBuf::from("/var/log/tiles"));
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("YES"));
        assert!(parse_bool(" on "));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("off"));
        assert!(!parse_bool("maybe"));
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        // Non-tilde paths should be unchanged
        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }
}
