//! Error types for the generation pipeline.
//!
//! Malformed declarations are not errors; they are reported as
//! [`Diagnostic`](crate::ir::Diagnostic)s. The variants here cover inputs
//! the templates cannot be instantiated with at all.

use thiserror::Error;

/// Result type alias for generation operations.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Error that occurred while instantiating or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// A name cannot be used as a Rust identifier.
    #[error("'{name}' is not a valid Rust identifier")]
    InvalidIdentifier { name: String },

    /// A declared visibility does not parse.
    #[error("invalid visibility '{visibility}' on '{name}'")]
    InvalidVisibility { name: String, visibility: String },

    /// Emitted tokens do not form a valid source file.
    #[error("failed to render {artifact}: {message}")]
    Render { artifact: String, message: String },
}

impl GeneratorError {
    pub fn invalid_identifier(name: impl Into<String>) -> Self {
        Self::InvalidIdentifier { name: name.into() }
    }

    pub fn invalid_visibility(name: impl Into<String>, visibility: impl Into<String>) -> Self {
        Self::InvalidVisibility {
            name: name.into(),
            visibility: visibility.into(),
        }
    }

    pub fn render(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            artifact: artifact.into(),
            message: message.into(),
        }
    }
}
