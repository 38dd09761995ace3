//! Aggregator: the whole-program `registration` artifact.
//!
//! Registration binds every declared id to its value converter and
//! comparer in one place. It is all-or-nothing: a single malformed
//! declaration anywhere in the program suppresses it, since a partial
//! registration would silently leave ids without persistence bindings.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use tracing::debug;

use crate::emit::parse_ident;
use crate::error::GeneratorResult;
use crate::ir::{Artifact, ArtifactKind, Capabilities, Declaration, Namespace};
use crate::render;
use crate::validate::all_well_formed;

/// Name of the generated registration function.
pub const REGISTER_FN: &str = "register_opaque_ids";

/// Produce the registration artifact, if the program qualifies for one.
///
/// Returns `None` when persistence is unavailable, when there are no
/// declarations, or when any declaration is malformed.
pub fn aggregate(
    declarations: &[Declaration],
    caps: &Capabilities,
) -> GeneratorResult<Option<Artifact>> {
    if !caps.persistence {
        debug!("persistence unavailable, skipping registration");
        return Ok(None);
    }
    if declarations.is_empty() {
        debug!("no declarations, skipping registration");
        return Ok(None);
    }
    if !all_well_formed(declarations) {
        debug!("malformed declarations present, suppressing registration");
        return Ok(None);
    }

    let tokens = registration_tokens(declarations, &caps.root_name)?;
    let hint = format!("{}.{}", caps.root_name, ArtifactKind::Registration.suffix());
    let content = render::render(&hint, tokens)?;

    debug!(entries = declarations.len(), "emitted registration");
    Ok(Some(Artifact::new(
        &caps.root_name,
        ArtifactKind::Registration,
        Namespace::root(),
        content,
    )))
}

/// Declarations in registration order: by qualified name, duplicates dropped.
pub fn registration_order(declarations: &[Declaration]) -> Vec<&Declaration> {
    let mut ordered: Vec<&Declaration> = declarations.iter().collect();
    ordered.sort_by_key(|declaration| declaration.qualified_name());
    ordered.dedup_by_key(|declaration| declaration.qualified_name());
    ordered
}

/// Tokens of the registration module.
pub fn registration_tokens(
    declarations: &[Declaration],
    root_name: &str,
) -> GeneratorResult<TokenStream> {
    let root = parse_ident(root_name)?;
    let register_fn = format_ident!("{}", REGISTER_FN);
    let module_doc = format!(
        "Persistence conventions for the opaque ids declared in `{}`.",
        root_name
    );

    let calls = registration_order(declarations)
        .into_iter()
        .map(|declaration| {
            let converter = item_path(
                &declaration.namespace,
                &format!("{}ValueConverter", declaration.name),
            )?;
            let comparer = item_path(
                &declaration.namespace,
                &format!("{}ValueComparer", declaration.name),
            )?;
            Ok(quote! {
                registry.register::<#converter, #comparer>();
            })
        })
        .collect::<GeneratorResult<Vec<_>>>()?;

    Ok(quote! {
        #[doc = #module_doc]
        pub mod #root {
            /// Register the value converter and comparer of every opaque id in the crate.
            pub fn #register_fn(registry: &mut ::opaque_id::persistence::ConventionRegistry) {
                #(#calls)*
            }
        }
    })
}

/// `crate::a::b::Name` as tokens.
fn item_path(namespace: &Namespace, name: &str) -> GeneratorResult<TokenStream> {
    let segments = namespace
        .segments()
        .iter()
        .map(|segment| parse_ident(segment))
        .collect::<GeneratorResult<Vec<_>>>()?;
    let name = parse_ident(name)?;
    Ok(quote!(crate #(:: #segments)* :: #name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;

    fn persistence() -> Capabilities {
        Capabilities::new("shop").with_persistence(true)
    }

    fn declarations() -> Vec<Declaration> {
        vec![
            Declaration::new("ProductId").with_namespace(Namespace::new(["catalog"])),
            Declaration::new("OrderId").with_namespace(Namespace::new(["orders"])),
            Declaration::new("AccountId"),
        ]
    }

    #[test]
    fn test_requires_persistence() {
        let caps = Capabilities::new("shop").with_serialization(true);
        assert!(aggregate(&declarations(), &caps).unwrap().is_none());
    }

    #[test]
    fn test_empty_program_has_no_registration() {
        assert!(aggregate(&[], &persistence()).unwrap().is_none());
    }

    #[test]
    fn test_single_malformed_declaration_suppresses() {
        let mut decls = declarations();
        decls.push(Declaration::new("Broken").with_well_formed(false));
        assert!(aggregate(&decls, &persistence()).unwrap().is_none());
    }

    #[test]
    fn test_registration_identity_and_entries() {
        let artifact = aggregate(&declarations(), &persistence()).unwrap().unwrap();
        assert_eq!(artifact.hint_name(), "shop.registration");
        assert!(artifact.content.contains("pub mod shop"));
        assert!(artifact.content.contains("pub fn register_opaque_ids"));
        assert!(artifact
            .content
            .contains("crate::orders::OrderIdValueConverter"));
        assert!(artifact.content.contains("crate::AccountIdValueComparer"));
    }

    #[test]
    fn test_entries_ordered_by_qualified_name() {
        let decls = declarations();
        let names: Vec<String> = registration_order(&decls)
            .into_iter()
            .map(Declaration::qualified_name)
            .collect();
        insta::assert_debug_snapshot!(names, @r#"
        [
            "crate::AccountId",
            "crate::catalog::ProductId",
            "crate::orders::OrderId",
        ]
        "#);
    }

    #[test]
    fn test_duplicates_registered_once() {
        let decls = vec![Declaration::new("OrderId"), Declaration::new("OrderId")];
        assert_eq!(registration_order(&decls).len(), 1);
    }

    #[test]
    fn test_invalid_root_name() {
        let caps = Capabilities::new("not valid").with_persistence(true);
        assert!(matches!(
            aggregate(&declarations(), &caps),
            Err(GeneratorError::InvalidIdentifier { .. })
        ));
    }
}
