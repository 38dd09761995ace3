//! Declaration IR: one annotated type as seen by the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage representation of an opaque id.
///
/// The numeric codes are part of the attribute surface: `kind = 1`
/// selects [`RepresentationKind::UniqueId128`] and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum RepresentationKind {
    /// 128-bit globally unique identifier, stored as `uuid::Uuid`.
    #[default]
    UniqueId128,
    /// Signed 32-bit integer.
    Integer32,
    /// Signed 64-bit integer.
    Integer64,
}

impl RepresentationKind {
    /// All kinds in code order.
    pub const ALL: [RepresentationKind; 3] = [
        RepresentationKind::UniqueId128,
        RepresentationKind::Integer32,
        RepresentationKind::Integer64,
    ];

    /// Numeric code used by the attribute surface.
    pub fn code(self) -> i64 {
        match self {
            RepresentationKind::UniqueId128 => 1,
            RepresentationKind::Integer32 => 2,
            RepresentationKind::Integer64 => 3,
        }
    }

    /// Look a kind up by its numeric code.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }

    /// Look a kind up by name. Accepts the Rust primitive spelling
    /// (`uuid`, `i32`, `i64`) as well as the long names, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match normalize(name).as_str() {
            "uuid" | "guid" | "uniqueid128" => Some(RepresentationKind::UniqueId128),
            "i32" | "int32" | "integer32" => Some(RepresentationKind::Integer32),
            "i64" | "int64" | "integer64" => Some(RepresentationKind::Integer64),
            _ => None,
        }
    }

    /// Rust type path of the raw storage.
    pub fn raw_type(self) -> &'static str {
        match self {
            RepresentationKind::UniqueId128 => "::uuid::Uuid",
            RepresentationKind::Integer32 => "i32",
            RepresentationKind::Integer64 => "i64",
        }
    }

    /// Whether this kind is backed by a machine integer.
    pub fn is_integer(self) -> bool {
        !matches!(self, RepresentationKind::UniqueId128)
    }
}

impl fmt::Display for RepresentationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepresentationKind::UniqueId128 => "UniqueId128",
            RepresentationKind::Integer32 => "Integer32",
            RepresentationKind::Integer64 => "Integer64",
        };
        f.write_str(name)
    }
}

/// How conversions between an id and its raw views are exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OperatorVisibility {
    /// `From` impls in both directions, so conversions happen through `.into()`.
    Implicit,
    /// Only named conversion functions; every call site spells the conversion out.
    #[default]
    Explicit,
}

impl OperatorVisibility {
    /// Numeric code used by the attribute surface.
    pub fn code(self) -> i64 {
        match self {
            OperatorVisibility::Implicit => 1,
            OperatorVisibility::Explicit => 2,
        }
    }

    /// Look a policy up by its numeric code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(OperatorVisibility::Implicit),
            2 => Some(OperatorVisibility::Explicit),
            _ => None,
        }
    }

    /// Look a policy up by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match normalize(name).as_str() {
            "implicit" => Some(OperatorVisibility::Implicit),
            "explicit" => Some(OperatorVisibility::Explicit),
            _ => None,
        }
    }

    pub fn is_implicit(self) -> bool {
        matches!(self, OperatorVisibility::Implicit)
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Module path a declaration lives in, relative to the crate root.
///
/// An empty path is the crate root itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Namespace(Vec<String>);

impl Namespace {
    /// The crate root module.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Return a copy of this namespace with one more trailing segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Absolute path of an item declared in this namespace, e.g. `crate::orders::OrderId`.
    pub fn qualify(&self, name: &str) -> String {
        let mut path = String::from("crate");
        for segment in &self.0 {
            path.push_str("::");
            path.push_str(segment);
        }
        path.push_str("::");
        path.push_str(name);
        path
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("crate")
        } else {
            write!(f, "crate::{}", self.0.join("::"))
        }
    }
}

/// Source position of a declaration, used to anchor diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    /// Source file as displayed to the user.
    pub file: String,
    /// Line number (1-indexed, 0 when unknown).
    pub line: usize,
    /// Column number (1-indexed, 0 when unknown).
    pub column: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// A location with no source position attached.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn is_known(&self) -> bool {
        !self.file.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_known() {
            return f.write_str("<unknown>");
        }
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// One annotated type, normalised by the extractor.
///
/// Everything downstream of extraction reads only this record; the
/// syntax it came from is gone by then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Simple identifier of the declared type.
    pub name: String,
    /// Module that contains the declaration.
    pub namespace: Namespace,
    pub kind: RepresentationKind,
    pub cast: OperatorVisibility,
    pub location: Location,
    /// Declared Rust visibility, reused on the generated struct.
    pub visibility: String,
    /// Doc comment lines carried over to the generated struct.
    pub docs: Vec<String>,
    /// Whether the declaration satisfies every structural condition.
    pub well_formed: bool,
}

impl Declaration {
    /// Create a well-formed declaration with default configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Namespace::root(),
            kind: RepresentationKind::default(),
            cast: OperatorVisibility::default(),
            location: Location::unknown(),
            visibility: "pub".to_string(),
            docs: Vec::new(),
            well_formed: true,
        }
    }

    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_kind(mut self, kind: RepresentationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_cast(mut self, cast: OperatorVisibility) -> Self {
        self.cast = cast;
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn with_visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility = visibility.into();
        self
    }

    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        self.docs.push(line.into());
        self
    }

    pub fn with_well_formed(mut self, well_formed: bool) -> Self {
        self.well_formed = well_formed;
        self
    }

    /// Absolute Rust path of the declared type.
    pub fn qualified_name(&self) -> String {
        self.namespace.qualify(&self.name)
    }
}
