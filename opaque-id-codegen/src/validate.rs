//! Validator: gates per-declaration emission on well-formedness.

use tracing::debug;

use crate::ir::{Declaration, Diagnostic};

/// Outcome of validating one declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The declaration may be handed to the emitter.
    Emit,
    /// The declaration is malformed; report this diagnostic and emit nothing.
    Reject(Diagnostic),
}

impl Verdict {
    pub fn is_emit(&self) -> bool {
        matches!(self, Verdict::Emit)
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Verdict::Emit => None,
            Verdict::Reject(diagnostic) => Some(diagnostic),
        }
    }
}

/// Validate one declaration.
///
/// A malformed declaration yields exactly one diagnostic no matter how
/// many structural conditions it breaks.
pub fn validate(declaration: &Declaration) -> Verdict {
    if declaration.well_formed {
        return Verdict::Emit;
    }

    debug!(
        name = %declaration.name,
        location = %declaration.location,
        "rejecting malformed declaration"
    );
    Verdict::Reject(Diagnostic::malformed_declaration(
        &declaration.name,
        declaration.location.clone(),
    ))
}

/// Whether every declaration in the program is well formed.
pub fn all_well_formed(declarations: &[Declaration]) -> bool {
    declarations.iter().all(|declaration| declaration.well_formed)
}
