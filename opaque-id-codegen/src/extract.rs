//! Declaration extractor.
//!
//! Normalises a [`Candidate`] into a [`Declaration`]: resolves the
//! representation kind and operator visibility from the attribute
//! arguments and computes the well-formedness flag. Extraction never
//! fails; missing or unrecognised arguments fall back to the defaults.

use tracing::trace;

use crate::ir::{Declaration, OperatorVisibility, RepresentationKind};
use crate::syntax::{ArgValue, AttributeArgs, Candidate, ItemKind};

/// Argument keys that select the representation kind.
const KIND_KEYS: [&str; 2] = ["type", "kind"];

/// Argument keys that select the operator visibility.
const CAST_KEYS: [&str; 2] = ["cast_operator", "cast"];

/// Resolved attribute configuration of one declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdConfig {
    pub kind: RepresentationKind,
    pub cast: OperatorVisibility,
}

impl IdConfig {
    /// Resolve the configuration from attribute arguments.
    pub fn from_args(args: &AttributeArgs) -> Self {
        let kind = lookup(args, &KIND_KEYS)
            .and_then(|value| match value {
                ArgValue::Int(code) => RepresentationKind::from_code(*code),
                other => other.as_name().and_then(RepresentationKind::from_name),
            })
            .unwrap_or_default();

        let cast = lookup(args, &CAST_KEYS)
            .and_then(|value| match value {
                ArgValue::Int(code) => OperatorVisibility::from_code(*code),
                ArgValue::Bool(true) => Some(OperatorVisibility::Implicit),
                ArgValue::Bool(false) => Some(OperatorVisibility::Explicit),
                other => other.as_name().and_then(OperatorVisibility::from_name),
            })
            .unwrap_or_default();

        Self { kind, cast }
    }
}

fn lookup<'a>(args: &'a AttributeArgs, keys: &[&str]) -> Option<&'a ArgValue> {
    keys.iter().find_map(|key| args.get(key))
}

/// Whether a candidate satisfies all four structural conditions.
pub fn is_well_formed(candidate: &Candidate) -> bool {
    candidate.item_kind == ItemKind::Struct
        && !candidate.nested
        && candidate.namespace.is_some()
        && candidate.unit
        && !candidate.generic
}

/// Turn a candidate into a normalised declaration.
pub fn extract(candidate: Candidate) -> Declaration {
    let config = IdConfig::from_args(&candidate.args);
    let well_formed = is_well_formed(&candidate);

    trace!(
        name = %candidate.name,
        kind = %config.kind,
        well_formed,
        "extracted declaration"
    );

    Declaration {
        name: candidate.name,
        namespace: candidate.namespace.unwrap_or_default(),
        kind: config.kind,
        cast: config.cast,
        location: candidate.location,
        visibility: candidate.visibility,
        docs: candidate.docs,
        well_formed,
    }
}
