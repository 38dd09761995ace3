//! Discovery of the crate's module files.
//!
//! Walks the source directory in path order and pairs each `.rs` file
//! with the module path it defines, so the parser never has to reason
//! about file layout. Excluded directories (the output directory) are
//! pruned from the walk entirely.

use crate::error::{CliResult, ScanError};
use crate::parser::module_namespace;
use ignore::types::TypesBuilder;
use ignore::{DirEntry, WalkBuilder};
use opaque_id_codegen::Namespace;
use std::path::{Path, PathBuf};
use tracing::trace;

/// One module file of the crate.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,

    /// Path relative to the source directory.
    pub relative_path: PathBuf,

    /// Module the file defines; `None` outside the module tree.
    pub module: Option<Namespace>,

    /// Whether the file matches the scanner's filter (always true without one).
    pub selected: bool,

    pub content: String,
}

/// Walks a source directory for module files.
#[derive(Debug)]
pub struct SourceScanner {
    root: PathBuf,
    respect_gitignore: bool,
    filter: Option<glob::Pattern>,
    excluded: Vec<PathBuf>,
}

impl SourceScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            respect_gitignore: true,
            filter: None,
            excluded: Vec::new(),
        }
    }

    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Mark files whose path relative to the root matches `pattern` as
    /// selected. Unselected files are still read.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, ScanError> {
        let pattern = glob::Pattern::new(pattern)
            .map_err(|e| ScanError::invalid_pattern(pattern, e.to_string()))?;
        self.filter = Some(pattern);
        Ok(self)
    }

    /// Skip everything below `dir`.
    pub fn exclude(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded.push(dir.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every module file under the root, in path order.
    ///
    /// An existing directory without Rust files yields an empty list.
    pub fn scan(&self) -> CliResult<Vec<SourceFile>> {
        if !self.root.is_dir() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        let mut types = TypesBuilder::new();
        types.add_defaults();
        types.select("rust");
        let types = types.build().map_err(ScanError::Walk)?;

        let excluded = self.excluded.clone();
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(self.respect_gitignore)
            .hidden(false)
            .types(types)
            .filter_entry(move |entry| !excluded.iter().any(|dir| entry.path().starts_with(dir)))
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            if let Some(file) = self.read_module(&entry)? {
                files.push(file);
            }
        }
        Ok(files)
    }

    fn read_module(&self, entry: &DirEntry) -> CliResult<Option<SourceFile>> {
        if !entry.file_type().is_some_and(|kind| kind.is_file()) {
            return Ok(None);
        }

        let path = entry.path();
        let relative_path = path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();
        let selected = self
            .filter
            .as_ref()
            .map_or(true, |pattern| pattern.matches_path(&relative_path));

        let content = std::fs::read_to_string(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let module = module_namespace(&relative_path);
        trace!(file = %relative_path.display(), module = ?module, "module file");

        Ok(Some(SourceFile {
            path: path.to_path_buf(),
            relative_path,
            module,
            selected,
            content,
        }))
    }
}
