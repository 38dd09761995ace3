//! One pass over a crate, and the files it produces.
//!
//! The generator ties the pieces together: the manifest gives the
//! capabilities, the scanner and parser give the declarations in their
//! module context, and the codegen pipeline turns them into artifacts and
//! diagnostics. [`ProjectGenerator::plan`] maps artifacts onto output
//! paths; writing is left to the caller so `generate`, `validate` and
//! `expand` share the same pass.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use opaque_id_codegen::{
    capabilities, extract, Artifact, ArtifactKind, Capabilities, Declaration, GenerationOutput,
    Generator,
};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{CliResult, ParseError};
use crate::manifest::Manifest;
use crate::parser::SourceParser;
use crate::scanner::SourceScanner;

/// Result of one pass over a crate.
#[derive(Debug)]
pub struct ProjectOutput {
    pub capabilities: Capabilities,
    pub files_scanned: usize,
    pub declarations: Vec<Declaration>,
    pub output: GenerationOutput,
    /// Files that could not be parsed; their declarations are missing.
    pub parse_errors: Vec<ParseError>,
}

impl ProjectOutput {
    /// Whether every module file parsed, so the declaration set is the
    /// whole program. An incomplete pass never produces a registration.
    pub fn is_complete(&self) -> bool {
        self.parse_errors.is_empty()
    }

    /// Artifacts of one declaration, looked up by simple name.
    pub fn artifacts_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Artifact> + 'a {
        self.output.artifacts_for(name)
    }
}

/// A file the pass wants on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub path: PathBuf,
    pub kind: ArtifactKind,
    pub content: String,
}

/// Runs passes over one crate.
#[derive(Debug, Clone)]
pub struct ProjectGenerator {
    crate_root: PathBuf,
    config: Config,
    filter: Option<String>,
}

impl ProjectGenerator {
    /// Create a generator for the crate rooted at `crate_root`.
    pub fn new(crate_root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            crate_root: crate_root.into(),
            config,
            filter: None,
        }
    }

    /// Only write per-declaration files for sources matching a glob,
    /// relative to the source directory. The registration still covers
    /// every declaration of the crate.
    pub fn with_filter(mut self, pattern: Option<String>) -> Self {
        self.filter = pattern;
        self
    }

    pub fn crate_root(&self) -> &Path {
        &self.crate_root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one complete pass.
    #[tracing::instrument(skip(self), fields(crate_root = %self.crate_root.display()))]
    pub fn run(&self) -> CliResult<ProjectOutput> {
        let manifest = Manifest::load(&self.crate_root)?;
        let caps = capabilities::detect(manifest.references(), manifest.project_name());

        let mut scanner = SourceScanner::new(self.config.source_dir(&self.crate_root))
            .with_gitignore(self.config.scan.respect_gitignore)
            .exclude(self.config.output_dir(&self.crate_root));
        if let Some(pattern) = &self.filter {
            scanner = scanner.with_filter(pattern)?;
        }
        let files = scanner.scan()?;

        let (candidates, parse_errors) = SourceParser::new().parse_files(&files);
        let declarations: Vec<Declaration> =
            candidates.into_iter().map(extract::extract).collect();

        let mut output = Generator::new(caps.clone()).run(&declarations)?;
        if !parse_errors.is_empty() {
            warn!(
                unparsed = parse_errors.len(),
                "declaration set incomplete, registration withheld"
            );
            output.registration = None;
        }
        if self.filter.is_some() {
            let selected_files: BTreeSet<String> = files
                .iter()
                .filter(|file| file.selected)
                .map(|file| file.relative_path.to_string_lossy().replace('\\', "/"))
                .collect();
            let selected: BTreeSet<String> = declarations
                .iter()
                .filter(|declaration| selected_files.contains(&declaration.location.file))
                .map(Declaration::qualified_name)
                .collect();
            output.artifacts.retain(|artifact| {
                selected.contains(&artifact.namespace.qualify(&artifact.declaring_name))
            });
        }

        info!(
            files = files.len(),
            declarations = declarations.len(),
            diagnostics = output.diagnostics.len(),
            "pass finished"
        );
        Ok(ProjectOutput {
            capabilities: caps,
            files_scanned: files.len(),
            declarations,
            output,
            parse_errors,
        })
    }

    /// Output paths for the artifacts of a pass.
    ///
    /// Per-declaration artifacts land under the output directory in a
    /// directory per module; the registration artifact goes to the
    /// configured registration file.
    pub fn plan(&self, output: &GenerationOutput) -> Vec<PlannedFile> {
        let out_dir = self.config.output_dir(&self.crate_root);
        let mut files = Vec::new();

        if self.config.output.write_declarations {
            files.extend(output.artifacts.iter().map(|artifact| {
                let dir = artifact
                    .namespace
                    .segments()
                    .iter()
                    .fold(out_dir.clone(), |dir, segment| dir.join(segment));
                PlannedFile {
                    path: dir.join(artifact.file_name()),
                    kind: artifact.kind,
                    content: artifact.content.clone(),
                }
            }));
        }

        if let Some(registration) = &output.registration {
            files.push(PlannedFile {
                path: self.registration_path(),
                kind: ArtifactKind::Registration,
                content: registration.content.clone(),
            });
        }

        debug!(files = files.len(), "planned output");
        files
    }

    pub fn registration_path(&self) -> PathBuf {
        self.config.registration_path(&self.crate_root)
    }

    /// The registration file on disk when a complete pass no longer
    /// produces one.
    pub fn stale_registration(&self, result: &ProjectOutput) -> Option<PathBuf> {
        let path = self.registration_path();
        (result.is_complete() && result.output.registration.is_none() && path.exists())
            .then_some(path)
    }

    /// Planned files whose on-disk content differs, plus a stale
    /// registration file.
    pub fn out_of_date(&self, result: &ProjectOutput) -> Vec<PathBuf> {
        let mut stale: Vec<PathBuf> = self
            .plan(&result.output)
            .into_iter()
            .filter(|file| {
                std::fs::read_to_string(&file.path)
                    .map_or(true, |existing| existing != file.content)
            })
            .map(|file| file.path)
            .collect();
        stale.extend(self.stale_registration(result));
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(manifest: &str, files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Cargo.toml"), manifest).unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    const MANIFEST: &str = "[package]\nname = \"shop\"\n[dependencies]\nredb = \"3\"\n";

    #[test]
    fn test_run_collects_declarations_with_modules() {
        let dir = project(
            MANIFEST,
            &[
                ("src/lib.rs", "pub mod orders;\n#[opaque_id]\npub struct UserId;\n"),
                ("src/orders.rs", "#[opaque_id(kind = \"i32\")]\npub struct OrderId;\n"),
            ],
        );
        let generator = ProjectGenerator::new(dir.path(), Config::default());
        let result = generator.run().unwrap();

        assert_eq!(result.files_scanned, 2);
        let qualified: Vec<String> = result
            .declarations
            .iter()
            .map(Declaration::qualified_name)
            .collect();
        assert_eq!(qualified, vec!["crate::UserId", "crate::orders::OrderId"]);
        assert!(result.capabilities.persistence);
        assert!(result.output.registration.is_some());
    }

    #[test]
    fn test_plan_paths() {
        let dir = project(
            MANIFEST,
            &[("src/orders/mod.rs", "#[opaque_id]\npub struct OrderId;\n")],
        );
        let generator = ProjectGenerator::new(dir.path(), Config::default());
        let result = generator.run().unwrap();

        let paths: Vec<PathBuf> = generator
            .plan(&result.output)
            .into_iter()
            .map(|file| file.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("src/generated/orders/OrderId.core.rs"),
                PathBuf::from("src/generated/orders/OrderId.valueConverter.rs"),
                PathBuf::from("src/generated/orders/OrderId.valueComparer.rs"),
                PathBuf::from("src/generated/registration.rs"),
            ]
        );
    }

    #[test]
    fn test_plan_without_declarations() {
        let dir = project(MANIFEST, &[("src/lib.rs", "#[opaque_id]\npub struct Id;\n")]);
        let mut config = Config::default();
        config.output.write_declarations = false;
        let generator = ProjectGenerator::new(dir.path(), config);
        let result = generator.run().unwrap();

        let plan = generator.plan(&result.output);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].kind, ArtifactKind::Registration);
    }

    #[test]
    fn test_out_of_date_and_stale_registration() {
        let dir = project(MANIFEST, &[("src/lib.rs", "#[opaque_id]\npub struct Id;\n")]);
        let generator = ProjectGenerator::new(dir.path(), Config::default());
        let result = generator.run().unwrap();
        assert_eq!(generator.out_of_date(&result).len(), 4);

        for file in generator.plan(&result.output) {
            fs::create_dir_all(file.path.parent().unwrap()).unwrap();
            fs::write(&file.path, &file.content).unwrap();
        }
        assert!(generator.out_of_date(&result).is_empty());

        fs::write(dir.path().join("src/lib.rs"), "pub struct Id;\n").unwrap();
        let result = generator.run().unwrap();
        assert!(result.output.registration.is_none());
        assert_eq!(
            generator.stale_registration(&result),
            Some(generator.registration_path())
        );
    }

    #[test]
    fn test_filter_narrows_files_but_not_registration() {
        let dir = project(
            MANIFEST,
            &[
                ("src/lib.rs", "pub mod orders;\n#[opaque_id]\npub struct UserId;\n"),
                ("src/orders.rs", "#[opaque_id]\npub struct OrderId;\n"),
            ],
        );
        let generator = ProjectGenerator::new(dir.path(), Config::default())
            .with_filter(Some("orders.rs".to_string()));
        let result = generator.run().unwrap();

        assert!(result
            .output
            .artifacts
            .iter()
            .all(|artifact| artifact.declaring_name == "OrderId"));
        let registration = result.output.registration.unwrap();
        assert!(registration.content.contains("crate::UserIdValueConverter"));
        assert!(registration
            .content
            .contains("crate::orders::OrderIdValueConverter"));
    }

    #[test]
    fn test_malformed_declaration_outside_filter_blocks_registration() {
        let dir = project(
            MANIFEST,
            &[
                ("src/lib.rs", "pub mod orders;\n#[opaque_id]\npub enum Broken {}\n"),
                ("src/orders.rs", "#[opaque_id]\npub struct OrderId;\n"),
            ],
        );
        let generator = ProjectGenerator::new(dir.path(), Config::default())
            .with_filter(Some("orders.rs".to_string()));
        let result = generator.run().unwrap();

        assert_eq!(result.output.diagnostics.len(), 1);
        assert!(result.output.registration.is_none());
    }

    #[test]
    fn test_unparsable_file_withholds_registration() {
        let dir = project(
            MANIFEST,
            &[
                ("src/lib.rs", "pub mod orders;\n#[opaque_id]\npub struct UserId;\n"),
                (
                    "src/orders.rs",
                    "#[opaque_id]\npub struct OrderId;\nfn oops( {\n",
                ),
            ],
        );
        let generator = ProjectGenerator::new(dir.path(), Config::default());
        fs::create_dir_all(dir.path().join("src/generated")).unwrap();
        fs::write(generator.registration_path(), "// previous pass\n").unwrap();

        let result = generator.run().unwrap();

        assert!(!result.is_complete());
        assert!(result.output.registration.is_none());
        assert_eq!(generator.stale_registration(&result), None);
        assert!(generator
            .plan(&result.output)
            .iter()
            .all(|file| file.kind != ArtifactKind::Registration));
    }

    #[test]
    fn test_missing_manifest() {
        let dir = TempDir::new().unwrap();
        let generator = ProjectGenerator::new(dir.path(), Config::default());
        assert!(generator.run().is_err());
    }
}
