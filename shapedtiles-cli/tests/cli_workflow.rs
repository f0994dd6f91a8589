//! Integration tests for the shapedtiles binary.
//!
//! Each test runs the real binary with `HOME` pointed at a temporary
//! directory, so the config file and logs never touch the user's own.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const SQUARE: &str = r#"{
  "type": "FeatureCollection",
  "features": [{
    "type": "Feature",
    "properties": {"name": "square"},
    "geometry": {
      "type": "Polygon",
      "coordinates": [[[-30, -30], [30, -30], [30, 30], [-30, 30], [-30, -30]]]
    }
  }]
}"#;

struct Workspace {
    home: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.home.path().join(name)
    }

    fn polygon(&self) -> PathBuf {
        let path = self.path("square.geojson");
        fs::write(&path, SQUARE).unwrap();
        path
    }

    /// Run the CLI and capture output.
    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_shapedtiles"))
            .args(args)
            .env("HOME", self.home.path())
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute CLI command")
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Assert a command succeeded.
fn assert_success(output: &Output, context: &str) {
    if !output.status.success() {
        panic!(
            "{} failed with {}\nstdout:\n{}\nstderr:\n{}",
            context,
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_generate_then_inspect() {
    let ws = Workspace::new();
    let polygon = ws.polygon();
    let output = ws.path("square");

    let generated = ws.run(&[
        "generate",
        arg(&polygon),
        "-o",
        arg(&output),
        "--min-zoom",
        "2",
        "--max-zoom",
        "2",
        "--metatile",
        "1",
    ]);
    assert_success(&generated, "generate");
    assert!(stdout(&generated).contains("Generated 4 tiles"));

    let archive = ws.path("square.mbtiles");
    assert!(archive.exists());
    assert!(ws.path(".shapedtiles/logs/shapedtiles.log").exists());

    let inspected = ws.run(&["inspect", arg(&archive)]);
    assert_success(&inspected, "inspect");
    let text = stdout(&inspected);
    assert!(text.contains("format"));
    assert!(text.contains("png"));
    assert!(text.contains("Z2"));
}

#[test]
fn test_tiles_lists_xyz_and_tms_rows() {
    let ws = Workspace::new();
    let polygon = ws.polygon();

    let xyz = ws.run(&["tiles", arg(&polygon), "--min-zoom", "2", "--max-zoom", "2"]);
    assert_success(&xyz, "tiles");
    let lines: Vec<String> = stdout(&xyz).lines().map(str::to_string).collect();
    assert_eq!(lines, ["2/1/1", "2/1/2", "2/2/1", "2/2/2"]);

    let tms = ws.run(&[
        "tiles",
        arg(&polygon),
        "--min-zoom",
        "2",
        "--max-zoom",
        "2",
        "--tms",
    ]);
    assert_success(&tms, "tiles --tms");
    let lines: Vec<String> = stdout(&tms).lines().map(str::to_string).collect();
    assert_eq!(lines, ["2/1/2", "2/1/1", "2/2/2", "2/2/1"]);
}

#[test]
fn test_estimate_exact() {
    let ws = Workspace::new();
    let polygon = ws.polygon();

    let output = ws.run(&[
        "estimate",
        arg(&polygon),
        "--min-zoom",
        "2",
        "--max-zoom",
        "3",
        "--exact",
    ]);
    assert_success(&output, "estimate");
    let text = stdout(&output);
    assert!(text.contains("Overlapping"));
    assert!(text.contains("8 tiles"));
}

#[test]
fn test_config_init_and_show() {
    let ws = Workspace::new();

    let init = ws.run(&["config", "init"]);
    assert_success(&init, "config init");
    let config_path = ws.path(".shapedtiles/config.ini");
    assert!(config_path.exists());

    // A second init without --force refuses to overwrite
    let again = ws.run(&["config", "init"]);
    assert_eq!(again.status.code(), Some(1));

    let content = fs::read_to_string(&config_path).unwrap();
    fs::write(&config_path, content.replace("max = 14", "max = 12")).unwrap();

    let show = ws.run(&["config", "show"]);
    assert_success(&show, "config show");
    assert!(stdout(&show).contains("max = 12"));

    let path = ws.run(&["config", "path"]);
    assert_success(&path, "config path");
    assert!(stdout(&path).contains("config.ini"));
}

#[test]
fn test_invalid_polygon_exits_with_error() {
    let ws = Workspace::new();
    let bad = ws.path("point.geojson");
    fs::write(&bad, r#"{"type": "Point", "coordinates": [1, 2]}"#).unwrap();

    let output = ws.run(&["tiles", arg(&bad)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid polygon"));
}

#[test]
fn test_inverted_zoom_range_exits_with_error() {
    let ws = Workspace::new();
    let polygon = ws.polygon();

    let output = ws.run(&[
        "generate",
        arg(&polygon),
        "-o",
        arg(&ws.path("out")),
        "--min-zoom",
        "10",
        "--max-zoom",
        "5",
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid zoom range"));
    assert!(!ws.path("out.mbtiles").exists());
}
