//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let background = config
        .render
        .background
        .map(|c| c.to_string().trim_start_matches('#').to_string())
        .unwrap_or_default();
    let antialias = if config.render.antialias {
        "true"
    } else {
        "false"
    };

    format!(
        r#"[zoom]
; Default zoom range (0-22). Command-line --min-zoom/--max-zoom override these.
min = {}
max = {}

[render]
; Map scale factor in dots per inch (48-384, default: 96)
dpi = {}
; Tile image format: png (keeps transparency outside the polygon) or jpeg
format = {}
; JPEG quality 1-100 (default: 75). Ignored for png.
jpeg_quality = {}
; Meta-tile size: each tile is rendered as part of an NxN block so labels
; and symbols crossing tile edges stay intact (1-16, default: 4)
metatile_size = {}
; Antialias polygon edges and map features
antialias = {}
; Canvas colour as hex rrggbb or rrggbbaa (e.g. ffffff). Leave empty for
; transparent png tiles or white jpeg tiles.
background = {}

[archive]
; MBTiles metadata written to every archive
name = {}
description = {}
; Tiles written between database commits (default: 100)
commit_interval = {}

[logging]
; Log directory. Relative paths resolve against ~/.shapedtiles
directory = {}
file = {}
"#,
        config.zoom.min,
        config.zoom.max,
        config.render.dpi,
        config.render.format.metadata_name(),
        config.render.jpeg_quality,
        config.render.metatile_size,
        antialias,
        background,
        config.archive.name,
        config.archive.description,
        config.archive.commit_interval,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Render a path for the config file, using `~/` for paths under home.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
