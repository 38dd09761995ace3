//! # opaque-id-codegen
//!
//! Code generation engine for strongly-typed opaque identifiers.
//!
//! A user marks a unit struct with `#[opaque_id(...)]`; this crate turns
//! that declaration into a complete id type (constants, conversions,
//! formatting, parsing, ordering) plus optional serde and redb bindings,
//! and a whole-program registration of the persistence bindings.
//!
//! ## Pipeline
//!
//! ```text
//!  syn item ──► syntax::Candidate ──► extract ──► Declaration ──► validate ─┬─► emit ──► Artifact*
//!                                                                            └─► Diagnostic
//!  referenced modules ──► capabilities::detect ──► Capabilities
//!  all Declarations + Capabilities ──► aggregate ──► registration Artifact?
//! ```
//!
//! - [`syntax`] - attribute argument parsing and candidate items
//! - [`extract`] - normalisation into [`ir::Declaration`]
//! - [`capabilities`] - detection of the serde / redb integrations
//! - [`validate`] - well-formedness gate and diagnostics
//! - [`emit`] - per-declaration template families
//! - [`aggregate`] - the `registration` artifact
//! - [`pipeline`] - one complete pass
//!
//! ## Example
//!
//! ```rust
//! use opaque_id_codegen::{capabilities, extract, pipeline, syntax};
//!
//! let item: syn::Item = syn::parse_quote! {
//!     #[opaque_id(kind = "i64")]
//!     pub struct OrderId;
//! };
//! let attrs = syntax::item_attrs(&item).unwrap();
//! let args = syntax::AttributeArgs::from_attribute(syntax::find_marker(attrs).unwrap());
//! let candidate = syntax::Candidate::from_item(&item, args).unwrap();
//! let declaration = extract::extract(candidate);
//!
//! let caps = capabilities::detect(["serde"], "shop");
//! let output = pipeline::generate(&[declaration], &caps).unwrap();
//! assert_eq!(output.artifacts.len(), 2);
//! assert!(output.registration.is_none());
//! ```

pub mod aggregate;
pub mod capabilities;
pub mod emit;
pub mod error;
pub mod extract;
pub mod ir;
pub mod pipeline;
pub mod render;
pub mod syntax;
pub mod validate;

pub use error::{GeneratorError, GeneratorResult};
pub use ir::{
    Artifact, ArtifactKind, Capabilities, Declaration, Diagnostic, Location, Namespace,
    OperatorVisibility, RepresentationKind,
};
pub use pipeline::{generate, GenerationOutput, Generator};
