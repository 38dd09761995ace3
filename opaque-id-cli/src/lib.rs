//! # opaque-id-cli
//!
//! CLI library for the whole-crate opaque id pass.
//!
//! The attribute macro expands one declaration at a time and cannot see the
//! rest of the crate. This library runs the complete pass over a crate's
//! sources instead: every declaration is checked against its real module
//! context, diagnostics are reported in one place, and the crate-wide
//! registration of persistence conventions is written out.
//!
//! ## Architecture
//!
//! - [`config`] - `opaque-id.toml` loading and CLI overrides
//! - [`manifest`] - `Cargo.toml` reading: project name and referenced crates
//! - [`scanner`] - source file discovery and filtering
//! - [`parser`] - `#[opaque_id]` candidates with their module context
//! - [`generator`] - one pass over a crate and the files it produces
//! - [`writer`] - file output, removal and dry-run support
//! - [`watcher`] - file system watching for development mode
//! - [`error`] - error types and handling

pub mod config;
pub mod error;
pub mod generator;
pub mod manifest;
pub mod parser;
pub mod scanner;
pub mod watcher;
pub mod writer;

pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::{PlannedFile, ProjectGenerator, ProjectOutput};
pub use manifest::Manifest;
pub use parser::SourceParser;
pub use scanner::{SourceFile, SourceScanner};
pub use watcher::FileWatcher;
pub use writer::FileWriter;
