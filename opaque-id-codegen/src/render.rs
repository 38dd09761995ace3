//! Rendering of token streams into source text.

use proc_macro2::TokenStream;

use crate::error::{GeneratorError, GeneratorResult};

/// First line of every rendered artifact.
pub const GENERATED_HEADER: &str = "// @generated by opaque-id. Do not edit by hand.";

/// Render tokens as a formatted Rust source file.
///
/// The output depends only on the tokens, so identical inputs always
/// render to byte-identical text.
pub fn render(hint_name: &str, tokens: TokenStream) -> GeneratorResult<String> {
    let file: syn::File =
        syn::parse2(tokens).map_err(|e| GeneratorError::render(hint_name, e.to_string()))?;
    Ok(format!("{}\n\n{}", GENERATED_HEADER, prettyplease::unparse(&file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    #[test]
    fn test_render_formats_items() {
        let text = render("Id.core", quote!(pub struct Id(i32);)).unwrap();
        assert!(text.starts_with(GENERATED_HEADER));
        assert!(text.contains("pub struct Id(i32);"));
    }

    #[test]
    fn test_render_rejects_non_items() {
        let err = render("Id.core", quote!(let x = 1;)).unwrap_err();
        assert!(matches!(err, GeneratorError::Render { .. }));
    }
}
