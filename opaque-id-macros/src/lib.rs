//! # opaque-id-macros
//!
//! The `#[opaque_id]` attribute.
//!
//! The attribute is placed on a unit struct and replaces it with a complete
//! id type. Which integrations are generated follows the features enabled
//! on this crate (`serde`, `redb`), which the `opaque-id` crate forwards.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use opaque_id::opaque_id;
//!
//! /// Identifies a user.
//! #[opaque_id]
//! pub struct UserId;
//!
//! #[opaque_id(kind = "i32", cast = "implicit")]
//! pub struct RoleId;
//! ```
//!
//! ## Arguments
//!
//! - `kind` / `type` - `uuid` (default), `i32` or `i64`; the codes `1`, `2`, `3` are accepted too
//! - `cast` / `cast_operator` - `explicit` (default) or `implicit`; `2` and `1` are accepted too
//!
//! Unknown arguments or values fall back to the defaults.
//!
//! ## Restrictions
//!
//! The item must be a unit struct without generic parameters. Anything else
//! is reported as error `OID0001` and left untouched. `#[derive]` is
//! rejected, since the generated type already implements the common traits. Checks that depend on
//! where the item sits in the crate (nesting, module placement) are done by
//! the `opaque-id` CLI, which sees the whole crate.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{Attribute, Item};

use opaque_id_codegen::syntax::{self, AttributeArgs, Candidate};
use opaque_id_codegen::validate::{validate, Verdict};
use opaque_id_codegen::{capabilities, emit, extract, Capabilities};

/// Generate an opaque id type from a unit struct.
///
/// # Example
///
/// ```rust,ignore
/// #[opaque_id(kind = "i64")]
/// pub struct OrderId;
///
/// let id = OrderId::from_i64(7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[proc_macro_attribute]
pub fn opaque_id(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = syn::parse_macro_input!(item as Item);

    match opaque_id_impl(attr.into(), &item) {
        Ok(tokens) => tokens.into(),
        Err(err) => {
            let error = err.into_compile_error();
            quote!(#error #item).into()
        }
    }
}

fn opaque_id_impl(attr: TokenStream2, item: &Item) -> Result<TokenStream2, syn::Error> {
    let args = AttributeArgs::parse_tokens(attr);
    let candidate = Candidate::from_item(item, args).ok_or_else(|| {
        syn::Error::new_spanned(item, "#[opaque_id] can only be applied to a unit struct")
    })?;
    let declaration = extract::extract(candidate);

    if let Some(derive) = syntax::item_attrs(item)
        .unwrap_or_default()
        .iter()
        .find(|attr| attr.path().is_ident("derive"))
    {
        return Err(syn::Error::new_spanned(
            derive,
            "#[opaque_id] generates the id's trait impls itself; remove this #[derive]",
        ));
    }

    match validate(&declaration) {
        Verdict::Emit => {}
        Verdict::Reject(diagnostic) => {
            return Err(syn::Error::new_spanned(
                item_ident(item),
                format!("{} [{}]", diagnostic.message, diagnostic.code),
            ));
        }
    }

    let expansion = emit::expand(&declaration, &capabilities())
        .map_err(|err| syn::Error::new_spanned(item_ident(item), err.to_string()))?;
    let passthrough = passthrough_attrs(item);

    Ok(quote! {
        #(#passthrough)*
        #expansion
    })
}

/// Capabilities from this crate's enabled features.
fn capabilities() -> Capabilities {
    let mut references = Vec::new();
    if cfg!(feature = "serde") {
        references.push("serde");
    }
    if cfg!(feature = "redb") {
        references.push("redb");
    }
    let crate_name = std::env::var("CARGO_CRATE_NAME").unwrap_or_default();
    capabilities::detect(references, &crate_name)
}

/// Attributes other than docs and the marker, re-applied to the generated
/// struct. Derives are rejected before this point.
fn passthrough_attrs(item: &Item) -> Vec<&Attribute> {
    syntax::item_attrs(item)
        .unwrap_or_default()
        .iter()
        .filter(|attr| !attr.path().is_ident("doc") && !syntax::is_marker(attr))
        .collect()
}

fn item_ident(item: &Item) -> TokenStream2 {
    match item {
        Item::Struct(s) => s.ident.to_token_stream(),
        Item::Enum(e) => e.ident.to_token_stream(),
        Item::Union(u) => u.ident.to_token_stream(),
        Item::Trait(t) => t.ident.to_token_stream(),
        Item::Type(t) => t.ident.to_token_stream(),
        other => other.to_token_stream(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_rejected_at_the_attribute() {
        let item: Item = syn::parse_quote! {
            #[derive(Debug, Clone)]
            pub struct UserId;
        };
        let err = opaque_id_impl(TokenStream2::new(), &item).unwrap_err();
        assert!(err.to_string().contains("remove this #[derive]"));
    }

    #[test]
    fn test_other_attributes_pass_through() {
        let item: Item = syn::parse_quote! {
            #[allow(dead_code)]
            pub struct UserId;
        };
        let tokens = opaque_id_impl(TokenStream2::new(), &item).unwrap();
        assert!(tokens.to_string().contains("allow (dead_code)"));
    }
}
