//! Capability detector.
//!
//! Inspects the set of modules the host build references and derives the
//! [`Capabilities`] record for the pass. The CLI feeds it the dependency
//! names from `Cargo.toml`; the attribute macro feeds it its enabled
//! features.

use convert_case::{Case, Casing};
use tracing::debug;

use crate::ir::{Capabilities, PERSISTENCE_MODULE, SERIALIZATION_MODULE};

/// Root name used when the host project has no usable name.
pub const FALLBACK_ROOT_NAME: &str = "opaque_ids";

/// Detect capabilities from referenced module names and the project name.
pub fn detect<I, S>(references: I, project_name: &str) -> Capabilities
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut serialization = false;
    let mut persistence = false;

    for reference in references {
        let name = normalize_module(reference.as_ref());
        serialization |= name == SERIALIZATION_MODULE;
        persistence |= name == PERSISTENCE_MODULE;
    }

    let caps = Capabilities {
        serialization,
        persistence,
        root_name: root_name(project_name),
    };
    debug!(
        serialization = caps.serialization,
        persistence = caps.persistence,
        root = %caps.root_name,
        "detected capabilities"
    );
    caps
}

/// Cargo accepts both `-` and `_` in package names; compare on `_`.
fn normalize_module(name: &str) -> String {
    name.trim().replace('-', "_").to_lowercase()
}

/// Snake-case identifier derived from a project name.
pub fn root_name(project_name: &str) -> String {
    let cleaned: String = project_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let snake = cleaned.to_case(Case::Snake);
    let snake = snake.trim_matches('_');

    match snake.chars().next() {
        None => FALLBACK_ROOT_NAME.to_string(),
        Some(first) if first.is_ascii_digit() => format!("_{}", snake),
        Some(_) => snake.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_reference_set() {
        let caps = detect(Vec::<String>::new(), "shop");
        assert!(!caps.serialization);
        assert!(!caps.persistence);
        assert_eq!(caps.root_name, "shop");
    }

    #[test]
    fn test_detects_both_integrations() {
        let caps = detect(["tokio", "serde", "redb"], "shop");
        assert!(caps.serialization);
        assert!(caps.persistence);
    }

    #[test]
    fn test_presence_is_by_exact_module_name() {
        let caps = detect(["serde_json", "redb-extras", "serde_with"], "shop");
        assert!(!caps.serialization);
        assert!(!caps.persistence);
    }

    #[test]
    fn test_names_are_normalised() {
        let caps = detect([" Serde ", "REDB"], "shop");
        assert!(caps.serialization);
        assert!(caps.persistence);
    }

    #[test]
    fn test_root_name() {
        assert_eq!(root_name("my-app"), "my_app");
        assert_eq!(root_name("MyApp"), "my_app");
        assert_eq!(root_name("already_snake"), "already_snake");
        assert!(root_name("9lives").starts_with('_'));
        assert_eq!(root_name(""), FALLBACK_ROOT_NAME);
        assert_eq!(root_name("---"), FALLBACK_ROOT_NAME);
    }
}
