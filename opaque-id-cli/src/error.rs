//! CLI errors.
//!
//! A malformed declaration is not an error here: it is a diagnostic in the
//! pass output, and [`CliError::Diagnostics`] only reports at the end of a
//! command that some were printed.

use std::path::PathBuf;
use thiserror::Error;

use opaque_id_codegen::GeneratorError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read sources: {0}")]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("bad crate manifest: {0}")]
    Manifest(#[from] ManifestError),

    #[error("generation aborted: {0}")]
    Generate(#[from] GeneratorError),

    #[error("bad configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot update generated files: {0}")]
    Write(#[from] WriteError),

    #[error("file watching stopped: {0}")]
    Watch(#[from] WatchError),

    /// Generated files on disk do not match a fresh pass.
    #[error("generated files are stale: {0}")]
    Validation(String),

    #[error("{count} malformed opaque id declaration(s)")]
    Diagnostics { count: usize },

    /// Some module files did not parse, so the declaration set is partial
    /// and the registration file was left as it was.
    #[error("{count} source file(s) could not be parsed; registration not updated")]
    Unparsed { count: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit status: 2 for stale output, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Validation(_) => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("source directory {path} does not exist")]
    DirectoryNotFound { path: PathBuf },

    #[error("`{pattern}` is not a valid glob: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Walk(#[from] ignore::Error),
}

/// A source file `syn` could not parse; its declarations are skipped.
#[derive(Debug, Error)]
#[error("{file}:{line}:{column}: {message}")]
pub struct ParseError {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub message: String,
}

/// Problems with the crate's `Cargo.toml`.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("no Cargo.toml at {path}")]
    NotFound { path: PathBuf },

    #[error("{path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Neither `[package] name` nor `[lib] name` is present.
    #[error("{path} names neither a package nor a library")]
    MissingName { path: PathBuf },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration file at {path}")]
    NotFound { path: PathBuf },

    #[error("{path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    #[error("`{key}` {message}")]
    InvalidValue { key: String, message: String },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("creating {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("writing {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Removing a registration file the pass no longer produces.
    #[error("removing {path}: {source}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("cannot start watcher: {0}")]
    Init(String),

    #[error("cannot watch directory: {0}")]
    Notify(String),
}

impl ParseError {
    pub fn new(file: PathBuf, line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            file,
            line,
            column,
            message: message.into(),
        }
    }
}

impl ScanError {
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }

    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl ManifestError {
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }
}

impl ConfigError {
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}
