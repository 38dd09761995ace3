//! `Cargo.toml` reading.
//!
//! The pass needs two facts from the manifest: the project name, which
//! names the registration module, and the set of crates the project
//! references, from which integrations are detected.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::debug;

use crate::error::{CliResult, ManifestError};

/// Manifest file name.
pub const MANIFEST_FILENAME: &str = "Cargo.toml";

/// The only dependency table linked into the library. Build and dev
/// dependencies are not visible to generated code.
const DEPENDENCY_TABLE: &str = "dependencies";

/// The parts of a crate manifest the pass uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub path: PathBuf,
    pub package_name: Option<String>,
    pub lib_name: Option<String>,
    /// Names the crate's code refers to its dependencies by.
    pub dependencies: BTreeSet<String>,
}

impl Manifest {
    /// Read `Cargo.toml` from a crate root.
    pub fn load(crate_root: &Path) -> CliResult<Self> {
        let path = crate_root.join(MANIFEST_FILENAME);
        if !path.exists() {
            return Err(ManifestError::NotFound { path }.into());
        }
        let content = std::fs::read_to_string(&path).map_err(|e| ManifestError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(Self::parse(&content, &path)?)
    }

    /// Parse manifest text.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        let table: Table = toml::from_str(content)
            .map_err(|e| ManifestError::invalid_toml(path.to_path_buf(), e.to_string()))?;

        let package_name = string_at(&table, "package", "name");
        let lib_name = string_at(&table, "lib", "name");
        if package_name.is_none() && lib_name.is_none() {
            return Err(ManifestError::MissingName {
                path: path.to_path_buf(),
            });
        }

        let mut dependencies = BTreeSet::new();
        collect_dependencies(&table, &mut dependencies);
        if let Some(targets) = table.get("target").and_then(Value::as_table) {
            for target in targets.values().filter_map(Value::as_table) {
                collect_dependencies(target, &mut dependencies);
            }
        }

        debug!(
            path = %path.display(),
            dependencies = dependencies.len(),
            "read manifest"
        );
        Ok(Self {
            path: path.to_path_buf(),
            package_name,
            lib_name,
            dependencies,
        })
    }

    /// Name the registration module is derived from: `[lib] name` when set,
    /// the package name otherwise.
    pub fn project_name(&self) -> &str {
        self.lib_name
            .as_deref()
            .or(self.package_name.as_deref())
            .unwrap_or_default()
    }

    /// Referenced crates, as the code refers to them.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(String::as_str)
    }
}

fn string_at(table: &Table, section: &str, key: &str) -> Option<String> {
    table
        .get(section)?
        .as_table()?
        .get(key)?
        .as_str()
        .map(str::to_string)
}

/// Dependency keys are the names code uses, even for renamed packages.
fn collect_dependencies(table: &Table, into: &mut BTreeSet<String>) {
    if let Some(deps) = table.get(DEPENDENCY_TABLE).and_then(Value::as_table) {
        into.extend(deps.keys().map(|key| key.replace('-', "_")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Manifest {
        Manifest::parse(content, Path::new("Cargo.toml")).unwrap()
    }

    #[test]
    fn test_package_name_and_dependencies() {
        let manifest = parse(
            r#"
[package]
name = "shop-service"

[dependencies]
serde = { version = "1", features = ["derive"] }
redb = "3"
opaque-id = { path = "../opaque-id" }

[dev-dependencies]
tempfile = "3"
"#,
        );
        assert_eq!(manifest.project_name(), "shop-service");
        let refs: Vec<&str> = manifest.references().collect();
        assert_eq!(refs, vec!["opaque_id", "redb", "serde"]);
    }

    #[test]
    fn test_lib_name_wins() {
        let manifest = parse("[package]\nname = \"shop-service\"\n[lib]\nname = \"shop\"\n");
        assert_eq!(manifest.project_name(), "shop");
    }

    #[test]
    fn test_target_and_renamed_dependencies() {
        let manifest = parse(
            r#"
[package]
name = "app"

[target.'cfg(unix)'.dependencies]
redb = "3"

[dependencies]
json = { package = "serde_json", version = "1" }
"#,
        );
        assert!(manifest.dependencies.contains("redb"));
        assert!(manifest.dependencies.contains("json"));
        assert!(!manifest.dependencies.contains("serde_json"));
    }

    #[test]
    fn test_build_dependencies_are_not_referenced() {
        let manifest = parse(
            r#"
[package]
name = "app"

[build-dependencies]
serde = "1"
redb = "3"

[target.'cfg(unix)'.build-dependencies]
uuid = "1"
"#,
        );
        assert!(manifest.dependencies.is_empty());
        let caps = opaque_id_codegen::capabilities::detect(
            manifest.references(),
            manifest.project_name(),
        );
        assert!(!caps.serialization);
        assert!(!caps.persistence);
    }

    #[test]
    fn test_missing_name() {
        let result = Manifest::parse("[dependencies]\nserde = \"1\"\n", Path::new("Cargo.toml"));
        assert!(matches!(result, Err(ManifestError::MissingName { .. })));
    }

    #[test]
    fn test_invalid_toml() {
        let result = Manifest::parse("[package", Path::new("Cargo.toml"));
        assert!(matches!(result, Err(ManifestError::InvalidToml { .. })));
    }
}
