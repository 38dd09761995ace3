//! `jsonConverter` artifact: serde codec for the id.
//!
//! Both codecs delegate to the raw value's own impls, so the wire form of
//! an id is exactly that of its raw value in every serde format.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use super::{EmitContext, Template};
use crate::ir::{ArtifactKind, Capabilities, RepresentationKind};

/// Template for the serde `Serialize`/`Deserialize` impls.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonConverterTemplate;

impl Template for JsonConverterTemplate {
    fn artifact(&self) -> ArtifactKind {
        ArtifactKind::JsonConverter
    }

    fn is_enabled(&self, caps: &Capabilities) -> bool {
        caps.serialization
    }

    fn generate(&self, ctx: &EmitContext) -> TokenStream {
        match ctx.kind {
            RepresentationKind::UniqueId128 => uuid_codec(ctx),
            RepresentationKind::Integer32 | RepresentationKind::Integer64 => number_codec(ctx),
        }
    }
}

fn uuid_codec(ctx: &EmitContext) -> TokenStream {
    let ident = &ctx.ident;

    quote! {
        impl ::serde::Serialize for #ident {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                ::serde::Serialize::serialize(&self.0, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for #ident {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                <::uuid::Uuid as ::serde::Deserialize<'de>>::deserialize(deserializer).map(Self)
            }
        }
    }
}

fn number_codec(ctx: &EmitContext) -> TokenStream {
    let ident = &ctx.ident;
    let raw = ctx.raw_type();
    let (serialize_fn, from_raw, to_raw) = match ctx.kind {
        RepresentationKind::Integer64 => (
            format_ident!("serialize_i64"),
            format_ident!("from_i64"),
            format_ident!("to_i64"),
        ),
        _ => (
            format_ident!("serialize_i32"),
            format_ident!("from_i32"),
            format_ident!("to_i32"),
        ),
    };

    quote! {
        impl ::serde::Serialize for #ident {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.#serialize_fn(self.#to_raw())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for #ident {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                <#raw as ::serde::Deserialize<'de>>::deserialize(deserializer).map(Self::#from_raw)
            }
        }
    }
}
