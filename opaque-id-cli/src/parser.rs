//! Rust source parser for finding `#[opaque_id]` declarations.
//!
//! Unlike the attribute macro, the parser sees each declaration in its
//! module context: which module the file maps to, which inline `mod`
//! blocks enclose it, and whether it sits inside a function body or other
//! block. Those facts feed the structural checks of the pass.

use std::path::{Component, Path};

use opaque_id_codegen::syntax::{self, AttributeArgs, Candidate};
use opaque_id_codegen::{Location, Namespace};
use syn::visit::{self, Visit};
use syn::{Block, Item, ItemMod};
use tracing::debug;

use crate::error::{CliError, CliResult, ParseError};
use crate::scanner::SourceFile;

/// Directories and files under the source root that are not part of the
/// crate's module tree.
const OUTSIDE_MODULE_TREE: [&str; 5] = ["bin", "tests", "benches", "examples", "build.rs"];

/// Parser for Rust source files.
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceParser;

impl SourceParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a source file and collect its annotated items.
    pub fn parse_file(&self, source: &SourceFile) -> CliResult<Vec<Candidate>> {
        self.parse_source(&source.content, &source.relative_path, source.module.clone())
    }

    /// Parse source code whose file maps onto `namespace`.
    pub fn parse_source(
        &self,
        content: &str,
        file_path: &Path,
        namespace: Option<Namespace>,
    ) -> CliResult<Vec<Candidate>> {
        let file = syn::parse_file(content).map_err(|e| {
            let start = e.span().start();
            ParseError::new(
                file_path.to_path_buf(),
                start.line,
                start.column + 1,
                e.to_string(),
            )
        })?;

        let mut collector = CandidateCollector {
            file: file_path.to_string_lossy().replace('\\', "/"),
            namespace,
            depth: 0,
            candidates: Vec::new(),
        };
        collector.visit_file(&file);

        debug!(
            file = %file_path.display(),
            found = collector.candidates.len(),
            "parsed source file"
        );
        Ok(collector.candidates)
    }

    /// Parse multiple source files, collecting errors.
    pub fn parse_files(&self, sources: &[SourceFile]) -> (Vec<Candidate>, Vec<ParseError>) {
        let mut candidates = Vec::new();
        let mut errors = Vec::new();

        for source in sources {
            match self.parse_file(source) {
                Ok(parsed) => candidates.extend(parsed),
                Err(CliError::Parse(e)) => errors.push(e),
                Err(_) => {}
            }
        }

        (candidates, errors)
    }
}

/// Module path of a file, relative to the source root.
///
/// `lib.rs` and `main.rs` are the crate root, `a/mod.rs` and `a.rs` are
/// module `a`, `a/b.rs` is `a::b`. Files outside the module tree have no
/// namespace.
pub fn module_namespace(relative_path: &Path) -> Option<Namespace> {
    let mut segments: Vec<String> = relative_path
        .components()
        .map(|component| match component {
            Component::Normal(part) => part.to_str().map(str::to_string),
            _ => None,
        })
        .collect::<Option<_>>()?;

    let file = segments.pop()?;
    let stem = file.strip_suffix(".rs")?;

    let outside = segments
        .first()
        .map_or(file.as_str(), String::as_str);
    if OUTSIDE_MODULE_TREE.contains(&outside) {
        return None;
    }

    match stem {
        "mod" => {}
        "lib" | "main" if segments.is_empty() => {}
        _ => segments.push(stem.to_string()),
    }

    if segments.iter().any(|segment| !is_module_name(segment)) {
        return None;
    }
    Some(Namespace::new(segments))
}

fn is_module_name(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Syntax visitor tracking module path and block nesting.
struct CandidateCollector {
    file: String,
    namespace: Option<Namespace>,
    /// Number of enclosing blocks.
    depth: usize,
    candidates: Vec<Candidate>,
}

impl CandidateCollector {
    fn collect(&mut self, item: &Item) {
        let Some(marker) = syntax::item_attrs(item).and_then(syntax::find_marker) else {
            return;
        };
        let args = AttributeArgs::from_attribute(marker);
        let Some(candidate) = Candidate::from_item(item, args) else {
            return;
        };

        let start = item_name_start(item);
        let candidate = candidate
            .with_namespace(self.namespace.clone())
            .with_nested(self.depth > 0)
            .with_location(Location::new(&self.file, start.0, start.1));
        self.candidates.push(candidate);
    }
}

impl<'ast> Visit<'ast> for CandidateCollector {
    fn visit_item(&mut self, item: &'ast Item) {
        self.collect(item);
        visit::visit_item(self, item);
    }

    fn visit_item_mod(&mut self, item: &'ast ItemMod) {
        if item.content.is_none() {
            return;
        }
        let outer = self.namespace.clone();
        self.namespace = outer
            .as_ref()
            .map(|namespace| namespace.child(item.ident.to_string()));
        visit::visit_item_mod(self, item);
        self.namespace = outer;
    }

    fn visit_block(&mut self, block: &'ast Block) {
        self.depth += 1;
        visit::visit_block(self, block);
        self.depth -= 1;
    }
}

/// Line and 1-based column of the item's name.
fn item_name_start(item: &Item) -> (usize, usize) {
    let ident = match item {
        Item::Struct(s) => &s.ident,
        Item::Enum(e) => &e.ident,
        Item::Union(u) => &u.ident,
        Item::Trait(t) => &t.ident,
        Item::Type(t) => &t.ident,
        _ => return (0, 0),
    };
    let start = ident.span().start();
    (start.line, start.column + 1)
}
