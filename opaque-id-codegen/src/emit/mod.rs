//! Per-declaration emitter.
//!
//! Each artifact kind is produced by a [`Template`]. A template decides
//! from the [`Capabilities`] whether it applies and, when it does, picks
//! the variant matching the declaration's [`RepresentationKind`]. Adding
//! a representation kind means adding one arm to each template's
//! dispatch; adding an artifact means adding one template to
//! [`TEMPLATES`].
//!
//! Generated code refers to every external item by absolute path
//! (`::uuid::Uuid`, `::opaque_id::persistence::ValueConverter`) so it is
//! insensitive to the imports of the module it lands in.

mod id_type;
mod json;
mod persistence;

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::Visibility;
use tracing::trace;

use crate::error::{GeneratorError, GeneratorResult};
use crate::ir::{
    Artifact, ArtifactKind, Capabilities, Declaration, OperatorVisibility, RepresentationKind,
};
use crate::render;

pub use self::id_type::CoreTemplate;
pub use self::json::JsonConverterTemplate;
pub use self::persistence::{ValueComparerTemplate, ValueConverterTemplate};

/// A template family producing one artifact kind.
pub trait Template: Send + Sync {
    /// The artifact this template produces.
    fn artifact(&self) -> ArtifactKind;

    /// Whether the template applies under the given capabilities.
    fn is_enabled(&self, caps: &Capabilities) -> bool;

    /// Instantiate the template for one declaration.
    fn generate(&self, ctx: &EmitContext) -> TokenStream;
}

/// All templates, in emission order.
pub const TEMPLATES: [&dyn Template; 4] = [
    &CoreTemplate,
    &JsonConverterTemplate,
    &ValueConverterTemplate,
    &ValueComparerTemplate,
];

/// Everything a template needs to know about a declaration, already
/// converted into tokens.
#[derive(Debug, Clone)]
pub struct EmitContext {
    pub ident: Ident,
    pub vis: Visibility,
    pub docs: Vec<String>,
    pub kind: RepresentationKind,
    pub cast: OperatorVisibility,
}

impl EmitContext {
    /// Build the context for a declaration.
    pub fn new(declaration: &Declaration) -> GeneratorResult<Self> {
        let ident = parse_ident(&declaration.name)?;
        let vis = if declaration.visibility.trim().is_empty() {
            Visibility::Inherited
        } else {
            syn::parse_str::<Visibility>(&declaration.visibility).map_err(|_| {
                GeneratorError::invalid_visibility(&declaration.name, &declaration.visibility)
            })?
        };

        Ok(Self {
            ident,
            vis,
            docs: declaration.docs.clone(),
            kind: declaration.kind,
            cast: declaration.cast,
        })
    }

    /// Tokens of the raw storage type.
    pub fn raw_type(&self) -> TokenStream {
        match self.kind {
            RepresentationKind::UniqueId128 => quote!(::uuid::Uuid),
            RepresentationKind::Integer32 => quote!(i32),
            RepresentationKind::Integer64 => quote!(i64),
        }
    }

    /// `#[doc = ...]` attributes for the declaration's doc lines.
    pub fn doc_attrs(&self) -> TokenStream {
        let docs = &self.docs;
        quote! { #(#[doc = #docs])* }
    }

    /// The declaration identifier with a suffix, e.g. `OrderIdValueConverter`.
    pub fn suffixed(&self, suffix: &str) -> Ident {
        format_ident!("{}{}", self.ident, suffix)
    }
}

/// Parse a plain identifier, rejecting keywords and empty names.
pub(crate) fn parse_ident(name: &str) -> GeneratorResult<Ident> {
    syn::parse_str::<Ident>(name).map_err(|_| GeneratorError::invalid_identifier(name))
}

/// One instantiated template, not yet rendered to text.
#[derive(Debug, Clone)]
pub struct EmittedUnit {
    pub kind: ArtifactKind,
    pub tokens: TokenStream,
}

/// Instantiate every applicable template for a well-formed declaration.
pub fn emit_units(
    declaration: &Declaration,
    caps: &Capabilities,
) -> GeneratorResult<Vec<EmittedUnit>> {
    let ctx = EmitContext::new(declaration)?;

    Ok(TEMPLATES
        .iter()
        .filter(|template| template.is_enabled(caps))
        .map(|template| {
            trace!(name = %declaration.name, artifact = %template.artifact(), "instantiating template");
            EmittedUnit {
                kind: template.artifact(),
                tokens: template.generate(&ctx),
            }
        })
        .collect())
}

/// All per-declaration code as a single token stream, for in-build expansion.
pub fn expand(declaration: &Declaration, caps: &Capabilities) -> GeneratorResult<TokenStream> {
    let units = emit_units(declaration, caps)?;
    Ok(units.into_iter().map(|unit| unit.tokens).collect())
}

/// Instantiate and render every applicable template for a declaration.
pub fn emit_artifacts(
    declaration: &Declaration,
    caps: &Capabilities,
) -> GeneratorResult<Vec<Artifact>> {
    emit_units(declaration, caps)?
        .into_iter()
        .map(|unit| {
            let hint = format!("{}.{}", declaration.name, unit.kind.suffix());
            let content = render::render(&hint, unit.tokens)?;
            Ok(Artifact::new(
                &declaration.name,
                unit.kind,
                declaration.namespace.clone(),
                content,
            ))
        })
        .collect()
}
