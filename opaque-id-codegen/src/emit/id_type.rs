//! `core` artifact: the id type, its constants, conversions, formatting
//! and parsing.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use super::{EmitContext, Template};
use crate::ir::{ArtifactKind, Capabilities, RepresentationKind};

/// Template for the id type itself. Always enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreTemplate;

impl Template for CoreTemplate {
    fn artifact(&self) -> ArtifactKind {
        ArtifactKind::Core
    }

    fn is_enabled(&self, _caps: &Capabilities) -> bool {
        true
    }

    fn generate(&self, ctx: &EmitContext) -> TokenStream {
        match ctx.kind {
            RepresentationKind::UniqueId128 => unique_id(ctx),
            RepresentationKind::Integer32 | RepresentationKind::Integer64 => integer(ctx),
        }
    }
}

/// Struct definition shared by every kind.
fn definition(ctx: &EmitContext) -> TokenStream {
    let EmitContext { ident, vis, .. } = ctx;
    let docs = ctx.doc_attrs();
    let raw = ctx.raw_type();

    quote! {
        #docs
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
        #[repr(transparent)]
        #vis struct #ident(#raw);
    }
}

/// `From` impls in both directions between the id and one raw view.
fn bidirectional_from(
    ident: &Ident,
    raw: TokenStream,
    into_id: Ident,
    from_id: Ident,
) -> TokenStream {
    quote! {
        impl ::core::convert::From<#raw> for #ident {
            #[inline]
            fn from(value: #raw) -> Self {
                Self::#into_id(value)
            }
        }

        impl ::core::convert::From<#ident> for #raw {
            #[inline]
            fn from(id: #ident) -> Self {
                id.#from_id()
            }
        }
    }
}

fn unique_id(ctx: &EmitContext) -> TokenStream {
    let ident = &ctx.ident;
    let definition = definition(ctx);

    let conversions = if ctx.cast.is_implicit() {
        let uuid = bidirectional_from(
            ident,
            quote!(::uuid::Uuid),
            format_ident!("from_uuid"),
            format_ident!("to_uuid"),
        );
        let unsigned = bidirectional_from(
            ident,
            quote!(u128),
            format_ident!("from_u128"),
            format_ident!("to_u128"),
        );
        let signed = bidirectional_from(
            ident,
            quote!(i128),
            format_ident!("from_i128"),
            format_ident!("to_i128"),
        );
        quote! { #uuid #unsigned #signed }
    } else {
        TokenStream::new()
    };

    quote! {
        #definition

        impl #ident {
            /// The nil id; equal to the default value.
            pub const EMPTY: Self = Self(::uuid::Uuid::nil());

            /// Generate a fresh random id.
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Whether this is the nil id.
            pub const fn is_empty(&self) -> bool {
                self.0.is_nil()
            }

            pub const fn from_uuid(value: ::uuid::Uuid) -> Self {
                Self(value)
            }

            pub const fn to_uuid(self) -> ::uuid::Uuid {
                self.0
            }

            /// Build an id from the 128-bit unsigned view of its bytes.
            pub const fn from_u128(value: u128) -> Self {
                Self(::uuid::Uuid::from_u128(value))
            }

            pub const fn to_u128(self) -> u128 {
                self.0.as_u128()
            }

            /// Build an id from the two's-complement signed view of its bytes.
            pub const fn from_i128(value: i128) -> Self {
                Self::from_u128(value as u128)
            }

            pub const fn to_i128(self) -> i128 {
                self.to_u128() as i128
            }

            pub const fn as_bytes(&self) -> &[u8; 16] {
                self.0.as_bytes()
            }

            /// `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`
            pub const fn hyphenated(self) -> ::uuid::fmt::Hyphenated {
                self.0.hyphenated()
            }

            /// `xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx`
            pub const fn simple(self) -> ::uuid::fmt::Simple {
                self.0.simple()
            }

            /// `{xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx}`
            pub const fn braced(self) -> ::uuid::fmt::Braced {
                self.0.braced()
            }

            /// `urn:uuid:xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`
            pub const fn urn(self) -> ::uuid::fmt::Urn {
                self.0.urn()
            }

            /// Parse any textual form accepted by `FromStr`.
            pub fn try_parse(input: &str) -> ::core::option::Option<Self> {
                input.parse().ok()
            }

            /// Parse from a byte buffer holding ASCII text.
            pub fn parse_ascii(input: &[u8]) -> ::core::result::Result<Self, ::uuid::Error> {
                ::uuid::Uuid::try_parse_ascii(input).map(Self)
            }

            pub fn try_parse_ascii(input: &[u8]) -> ::core::option::Option<Self> {
                Self::parse_ascii(input).ok()
            }

            /// Write the hyphenated form into `dest`, returning the number of
            /// bytes written, or `None` when `dest` is too small.
            pub fn try_format(self, dest: &mut [u8]) -> ::core::option::Option<usize> {
                if dest.len() < ::uuid::fmt::Hyphenated::LENGTH {
                    return ::core::option::Option::None;
                }
                ::core::option::Option::Some(self.0.hyphenated().encode_lower(dest).len())
            }
        }

        impl ::core::fmt::Display for #ident {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl ::core::fmt::LowerHex for #ident {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::LowerHex::fmt(&self.0, f)
            }
        }

        impl ::core::fmt::UpperHex for #ident {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::UpperHex::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for #ident {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s).map(Self)
            }
        }

        #conversions
    }
}

fn integer(ctx: &EmitContext) -> TokenStream {
    let ident = &ctx.ident;
    let raw = ctx.raw_type();
    let definition = definition(ctx);
    let width = match ctx.kind {
        RepresentationKind::Integer64 => "i64",
        _ => "i32",
    };
    let from_raw = format_ident!("from_{}", width);
    let to_raw = format_ident!("to_{}", width);

    let conversions = if ctx.cast.is_implicit() {
        bidirectional_from(ident, raw.clone(), from_raw.clone(), to_raw.clone())
    } else {
        TokenStream::new()
    };

    let radix_impls = [
        quote!(LowerHex),
        quote!(UpperHex),
        quote!(Octal),
        quote!(Binary),
    ]
    .into_iter()
    .map(|fmt_trait| {
        quote! {
            impl ::core::fmt::#fmt_trait for #ident {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    ::core::fmt::#fmt_trait::fmt(&self.0, f)
                }
            }
        }
    });

    quote! {
        #definition

        impl #ident {
            /// The zero id; equal to the default value.
            pub const EMPTY: Self = Self(0);

            /// Whether this is the zero id.
            pub const fn is_empty(&self) -> bool {
                self.0 == 0
            }

            pub const fn #from_raw(value: #raw) -> Self {
                Self(value)
            }

            pub const fn #to_raw(self) -> #raw {
                self.0
            }

            /// Parse the decimal form.
            pub fn try_parse(input: &str) -> ::core::option::Option<Self> {
                input.parse().ok()
            }

            /// Parse the decimal form from a byte buffer holding ASCII text.
            pub fn try_parse_ascii(input: &[u8]) -> ::core::option::Option<Self> {
                ::core::str::from_utf8(input).ok()?.parse().ok()
            }

            /// Write the decimal form into `dest`, returning the number of
            /// bytes written, or `None` when `dest` is too small.
            pub fn try_format(self, dest: &mut [u8]) -> ::core::option::Option<usize> {
                struct SliceWriter<'a> {
                    buf: &'a mut [u8],
                    len: usize,
                }

                impl ::core::fmt::Write for SliceWriter<'_> {
                    fn write_str(&mut self, s: &str) -> ::core::fmt::Result {
                        let end = self.len + s.len();
                        let slot = self.buf.get_mut(self.len..end).ok_or(::core::fmt::Error)?;
                        slot.copy_from_slice(s.as_bytes());
                        self.len = end;
                        ::core::result::Result::Ok(())
                    }
                }

                let mut writer = SliceWriter { buf: dest, len: 0 };
                ::core::fmt::Write::write_fmt(&mut writer, ::core::format_args!("{}", self.0)).ok()?;
                ::core::option::Option::Some(writer.len)
            }
        }

        impl ::core::fmt::Display for #ident {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        #(#radix_impls)*

        impl ::core::str::FromStr for #ident {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                <#raw as ::core::str::FromStr>::from_str(s).map(Self)
            }
        }

        #conversions
    }
}
