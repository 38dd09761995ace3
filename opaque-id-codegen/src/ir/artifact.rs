//! Generated artifacts and their identities.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::declaration::Namespace;

/// Which template family produced an artifact.
///
/// Variants are declared in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// The id type itself.
    Core,
    /// Serialization codec.
    JsonConverter,
    /// Persistence value converter.
    ValueConverter,
    /// Persistence value comparer.
    ValueComparer,
    /// Whole-program persistence registration.
    Registration,
}

impl ArtifactKind {
    /// Identity suffix of the artifact.
    pub fn suffix(self) -> &'static str {
        match self {
            ArtifactKind::Core => "core",
            ArtifactKind::JsonConverter => "jsonConverter",
            ArtifactKind::ValueConverter => "valueConverter",
            ArtifactKind::ValueComparer => "valueComparer",
            ArtifactKind::Registration => "registration",
        }
    }

    /// Whether the artifact belongs to a single declaration.
    pub fn is_per_declaration(self) -> bool {
        !matches!(self, ArtifactKind::Registration)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A named unit of generated source text.
///
/// Identity is `(declaring_name, kind)`; two artifacts with the same
/// identity are never produced in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Declaration name, or the project root name for the registration artifact.
    pub declaring_name: String,
    pub kind: ArtifactKind,
    /// Module the artifact's code belongs to.
    pub namespace: Namespace,
    /// Rendered Rust source.
    pub content: String,
}

impl Artifact {
    pub fn new(
        declaring_name: impl Into<String>,
        kind: ArtifactKind,
        namespace: Namespace,
        content: impl Into<String>,
    ) -> Self {
        Self {
            declaring_name: declaring_name.into(),
            kind,
            namespace,
            content: content.into(),
        }
    }

    /// `{DeclarationName}.{suffix}`.
    pub fn hint_name(&self) -> String {
        format!("{}.{}", self.declaring_name, self.kind.suffix())
    }

    /// File name the artifact is written under.
    pub fn file_name(&self) -> String {
        format!("{}.rs", self.hint_name())
    }
}
