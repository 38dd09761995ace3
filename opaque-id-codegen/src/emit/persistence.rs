//! `valueConverter` and `valueComparer` artifacts: persistence bindings.
//!
//! The converter maps the id to its provider value (`u128` for UUID ids,
//! the raw integer otherwise) and stores it through redb's encoding of
//! that provider type. The comparer is the same for every kind: it orders
//! and hashes decoded ids with the id type's own `Ord` and `Hash`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{EmitContext, Template};
use crate::ir::{ArtifactKind, Capabilities, RepresentationKind};

/// Template for the `{Name}ValueConverter` type and redb `Value` impl.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueConverterTemplate;

/// Template for the `{Name}ValueComparer` type and redb `Key` impl.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueComparerTemplate;

impl Template for ValueConverterTemplate {
    fn artifact(&self) -> ArtifactKind {
        ArtifactKind::ValueConverter
    }

    fn is_enabled(&self, caps: &Capabilities) -> bool {
        caps.persistence
    }

    fn generate(&self, ctx: &EmitContext) -> TokenStream {
        let (provider, from_provider, to_provider) = match ctx.kind {
            RepresentationKind::UniqueId128 => (
                quote!(u128),
                format_ident!("from_u128"),
                format_ident!("to_u128"),
            ),
            RepresentationKind::Integer32 => (
                quote!(i32),
                format_ident!("from_i32"),
                format_ident!("to_i32"),
            ),
            RepresentationKind::Integer64 => (
                quote!(i64),
                format_ident!("from_i64"),
                format_ident!("to_i64"),
            ),
        };
        converter(ctx, provider, from_provider, to_provider)
    }
}

fn converter(
    ctx: &EmitContext,
    provider: TokenStream,
    from_provider: proc_macro2::Ident,
    to_provider: proc_macro2::Ident,
) -> TokenStream {
    let EmitContext { ident, vis, .. } = ctx;
    let converter = ctx.suffixed("ValueConverter");
    let converter_doc = format!("Converts [`{}`] to and from its stored representation.", ident);
    let type_name = ident.to_string();

    quote! {
        #[doc = #converter_doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
        #vis struct #converter;

        impl ::opaque_id::persistence::ValueConverter for #converter {
            type Model = #ident;
            type Provider = #provider;

            fn to_provider(&self, model: &#ident) -> #provider {
                model.#to_provider()
            }

            fn from_provider(&self, provider: #provider) -> #ident {
                #ident::#from_provider(provider)
            }
        }

        impl ::redb::Value for #ident {
            type SelfType<'a> = #ident;
            type AsBytes<'a> = <#provider as ::redb::Value>::AsBytes<'a>;

            fn fixed_width() -> ::core::option::Option<usize> {
                <#provider as ::redb::Value>::fixed_width()
            }

            fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
            where
                Self: 'a,
            {
                ::opaque_id::persistence::ValueConverter::from_provider(
                    &#converter,
                    <#provider as ::redb::Value>::from_bytes(data),
                )
            }

            fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a> {
                <#provider as ::redb::Value>::as_bytes(
                    &::opaque_id::persistence::ValueConverter::to_provider(&#converter, value),
                )
            }

            fn type_name() -> ::redb::TypeName {
                ::redb::TypeName::new(::core::concat!(module_path!(), "::", #type_name))
            }
        }
    }
}

impl Template for ValueComparerTemplate {
    fn artifact(&self) -> ArtifactKind {
        ArtifactKind::ValueComparer
    }

    fn is_enabled(&self, caps: &Capabilities) -> bool {
        caps.persistence
    }

    fn generate(&self, ctx: &EmitContext) -> TokenStream {
        let EmitContext { ident, vis, .. } = ctx;
        let comparer = ctx.suffixed("ValueComparer");
        let comparer_doc = format!(
            "Equality, hashing and snapshotting of [`{}`] for persistence.",
            ident
        );

        quote! {
            #[doc = #comparer_doc]
            #[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
            #vis struct #comparer;

            impl ::opaque_id::persistence::ValueComparer for #comparer {
                type Value = #ident;
            }

            impl ::redb::Key for #ident {
                fn compare(data1: &[u8], data2: &[u8]) -> ::core::cmp::Ordering {
                    let left = <#ident as ::redb::Value>::from_bytes(data1);
                    let right = <#ident as ::redb::Value>::from_bytes(data2);
                    ::core::cmp::Ord::cmp(&left, &right)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Declaration;

    fn converter_code(kind: RepresentationKind) -> String {
        let ctx = EmitContext::new(&Declaration::new("OrderId").with_kind(kind)).unwrap();
        ValueConverterTemplate.generate(&ctx).to_string()
    }

    #[test]
    fn test_gated_on_persistence() {
        let off = Capabilities::new("app").with_serialization(true);
        let on = Capabilities::new("app").with_persistence(true);
        assert!(!ValueConverterTemplate.is_enabled(&off));
        assert!(!ValueComparerTemplate.is_enabled(&off));
        assert!(ValueConverterTemplate.is_enabled(&on));
        assert!(ValueComparerTemplate.is_enabled(&on));
    }

    #[test]
    fn test_provider_per_kind() {
        assert!(converter_code(RepresentationKind::UniqueId128).contains("type Provider = u128"));
        assert!(converter_code(RepresentationKind::Integer32).contains("type Provider = i32"));
        assert!(converter_code(RepresentationKind::Integer64).contains("type Provider = i64"));
    }

    #[test]
    fn test_comparer_is_kind_independent() {
        let render = |kind| {
            let ctx = EmitContext::new(&Declaration::new("OrderId").with_kind(kind)).unwrap();
            ValueComparerTemplate.generate(&ctx).to_string()
        };
        let uuid = render(RepresentationKind::UniqueId128);
        assert_eq!(uuid, render(RepresentationKind::Integer32));
        assert_eq!(uuid, render(RepresentationKind::Integer64));
    }

    #[test]
    fn test_names() {
        let code = converter_code(RepresentationKind::Integer32);
        assert!(code.contains("OrderIdValueConverter"));
    }
}
