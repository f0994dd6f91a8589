//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`generate`] - Render a polygon into an MBTiles archive
//! - [`estimate`] - Preflight tile counts and memory use
//! - [`tiles`] - List the tiles a polygon covers
//! - [`inspect`] - Show an archive's metadata and tile counts
//! - [`config`] - Configuration management (path, init, show)

pub mod common;
pub mod config;
pub mod estimate;
pub mod generate;
pub mod inspect;
pub mod tiles;
