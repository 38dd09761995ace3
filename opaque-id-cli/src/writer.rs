//! Puts planned artifacts on disk.
//!
//! A file whose content is already current is not rewritten, which keeps
//! its mtime stable for cargo and for watch mode.

use crate::error::{CliResult, WriteError};
use crate::generator::PlannedFile;
use std::path::{Path, PathBuf};

/// What happened to one output path.
#[derive(Debug)]
pub enum WriteResult {
    Written { path: PathBuf, bytes: usize },
    Unchanged { path: PathBuf },
    Removed { path: PathBuf },
    /// Nothing was touched; `content` is `None` for a removal.
    DryRun {
        content: Option<String>,
        path: PathBuf,
    },
}

#[derive(Debug)]
pub struct FileWriter {
    dry_run: bool,
}

impl FileWriter {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Bring `path` to `content`, creating parent directories as needed.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if std::fs::read_to_string(path).is_ok_and(|existing| existing == content) {
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }

        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: Some(content.to_string()),
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Write every planned file.
    pub fn write_all(&self, files: &[PlannedFile]) -> CliResult<Vec<WriteResult>> {
        files
            .iter()
            .map(|file| self.write(&file.path, &file.content))
            .collect()
    }

    /// Remove a file.
    pub fn remove(&self, path: &Path) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: None,
                path: path.to_path_buf(),
            });
        }

        std::fs::remove_file(path).map_err(|e| WriteError::RemoveFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(WriteResult::Removed {
            path: path.to_path_buf(),
        })
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. }
            | WriteResult::Unchanged { path }
            | WriteResult::Removed { path }
            | WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Whether the file system changed.
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. } | WriteResult::Removed { .. })
    }

    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Written { bytes, .. } => *bytes,
            _ => 0,
        }
    }
}
