//! Syntax front end.
//!
//! Turns `syn` items carrying the `#[opaque_id(...)]` attribute into
//! [`Candidate`]s: the raw, unvalidated facts the extractor works from.
//! Both the attribute macro and the CLI scanner go through here.

use convert_case::{Case, Casing};
use darling::ast::NestedMeta;
use darling::FromMeta;
use proc_macro2::TokenStream;
use quote::ToTokens;
use std::collections::BTreeMap;
use syn::{Attribute, Expr, Fields, Generics, Item, Lit, Meta, Visibility};

use crate::ir::{Location, Namespace};

/// Name of the marker attribute.
pub const ATTRIBUTE_NAME: &str = "opaque_id";

/// A single attribute argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Bool(bool),
    /// A bare path such as `Integer32` or `RepresentationKind::Integer32`,
    /// reduced to its last segment.
    Ident(String),
}

impl ArgValue {
    fn from_expr(expr: &Expr) -> Option<Self> {
        match expr {
            Expr::Lit(lit) => match &lit.lit {
                Lit::Str(s) => Some(ArgValue::Str(s.value())),
                Lit::Int(i) => i.base10_parse::<i64>().ok().map(ArgValue::Int),
                Lit::Bool(b) => Some(ArgValue::Bool(b.value)),
                _ => None,
            },
            Expr::Path(path) => path
                .path
                .segments
                .last()
                .map(|segment| ArgValue::Ident(segment.ident.to_string())),
            Expr::Group(group) => Self::from_expr(&group.expr),
            Expr::Paren(paren) => Self::from_expr(&paren.expr),
            _ => None,
        }
    }

    /// Textual value, for strings and bare identifiers.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) | ArgValue::Ident(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ArgValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// Named arguments of one `#[opaque_id(...)]` attribute.
///
/// Keys are normalised to snake case, so `CastOperator = 1` and
/// `cast_operator = 1` land on the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeArgs {
    values: BTreeMap<String, ArgValue>,
}

impl AttributeArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: ArgValue) -> Self {
        self.values.insert(normalize_key(key), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.values.get(&normalize_key(key))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse the argument tokens of an attribute macro invocation.
    ///
    /// Unparsable input yields empty arguments.
    pub fn parse_tokens(tokens: TokenStream) -> Self {
        NestedMeta::parse_meta_list(tokens)
            .ok()
            .and_then(|items| Self::from_list(&items).ok())
            .unwrap_or_default()
    }

    /// Read the arguments of an already-parsed attribute.
    pub fn from_attribute(attr: &Attribute) -> Self {
        Self::from_meta(&attr.meta).unwrap_or_default()
    }
}

impl FromMeta for AttributeArgs {
    fn from_word() -> darling::Result<Self> {
        Ok(Self::default())
    }

    fn from_list(items: &[NestedMeta]) -> darling::Result<Self> {
        let mut args = Self::default();
        for item in items {
            let NestedMeta::Meta(Meta::NameValue(name_value)) = item else {
                continue;
            };
            let Some(ident) = name_value.path.get_ident() else {
                continue;
            };
            if let Some(value) = ArgValue::from_expr(&name_value.value) {
                args.values.insert(normalize_key(&ident.to_string()), value);
            }
        }
        Ok(args)
    }
}

fn normalize_key(key: &str) -> String {
    key.trim_start_matches("r#").to_case(Case::Snake)
}

/// Syntactic category of an annotated item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Struct,
    Enum,
    Union,
    Trait,
    TypeAlias,
}

/// Raw facts about one annotated item, before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub item_kind: ItemKind,
    pub args: AttributeArgs,
    /// Module the item lives in; `None` when the file is outside the module tree.
    pub namespace: Option<Namespace>,
    /// Declared inside a function body or other block.
    pub nested: bool,
    /// A struct with no fields (`struct Name;`).
    pub unit: bool,
    /// Has generic, lifetime or const parameters.
    pub generic: bool,
    pub location: Location,
    pub visibility: String,
    pub docs: Vec<String>,
}

impl Candidate {
    /// Build a candidate from an item, if the item kind can carry the attribute.
    ///
    /// Namespace defaults to the crate root and the item is assumed to be at
    /// module level; callers with more context override both.
    pub fn from_item(item: &Item, args: AttributeArgs) -> Option<Self> {
        let (name, item_kind, vis, attrs, generics, unit) = match item {
            Item::Struct(s) => (
                &s.ident,
                ItemKind::Struct,
                &s.vis,
                &s.attrs,
                &s.generics,
                matches!(s.fields, Fields::Unit),
            ),
            Item::Enum(e) => (&e.ident, ItemKind::Enum, &e.vis, &e.attrs, &e.generics, false),
            Item::Union(u) => (&u.ident, ItemKind::Union, &u.vis, &u.attrs, &u.generics, false),
            Item::Trait(t) => (&t.ident, ItemKind::Trait, &t.vis, &t.attrs, &t.generics, false),
            Item::Type(t) => (&t.ident, ItemKind::TypeAlias, &t.vis, &t.attrs, &t.generics, false),
            _ => return None,
        };

        Some(Self {
            name: name.to_string(),
            item_kind,
            args,
            namespace: Some(Namespace::root()),
            nested: false,
            unit,
            generic: has_parameters(generics),
            location: Location::unknown(),
            visibility: visibility_text(vis),
            docs: doc_lines(attrs),
        })
    }

    pub fn with_namespace(mut self, namespace: Option<Namespace>) -> Self {
        self.namespace = namespace;
        self
    }

    pub fn with_nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

/// Whether an attribute is the marker attribute, written bare or by path.
pub fn is_marker(attr: &Attribute) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == ATTRIBUTE_NAME)
}

/// Find the marker attribute among an item's attributes.
pub fn find_marker(attrs: &[Attribute]) -> Option<&Attribute> {
    attrs.iter().find(|attr| is_marker(attr))
}

/// Attributes of an item, for items that can carry the marker.
pub fn item_attrs(item: &Item) -> Option<&[Attribute]> {
    match item {
        Item::Struct(s) => Some(&s.attrs),
        Item::Enum(e) => Some(&e.attrs),
        Item::Union(u) => Some(&u.attrs),
        Item::Trait(t) => Some(&t.attrs),
        Item::Type(t) => Some(&t.attrs),
        _ => None,
    }
}

fn has_parameters(generics: &Generics) -> bool {
    !generics.params.is_empty()
}

fn visibility_text(vis: &Visibility) -> String {
    vis.to_token_stream().to_string()
}

/// Doc comment lines (`///` or `#[doc = "..."]`) in source order.
pub fn doc_lines(attrs: &[Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(lit) => match &lit.lit {
                    Lit::Str(s) => Some(s.value()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect()
}
