//! Property-based tests for the generation pipeline.
//!
//! Properties tested:
//! - Registration content does not depend on discovery order
//! - Validation gating: malformed declarations never produce artifacts
//! - Argument resolution never fails and always lands on a known kind

use proptest::prelude::*;
use std::collections::BTreeSet;

use opaque_id_codegen::extract::IdConfig;
use opaque_id_codegen::syntax::{ArgValue, AttributeArgs};
use opaque_id_codegen::{generate, Capabilities, Declaration, Namespace, RepresentationKind};

// =============================================================================
// Generators for property tests
// =============================================================================

/// Generate a type name that is a valid, non-keyword Rust identifier.
fn arb_type_name() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,12}".prop_map(|s| format!("{}Id", s))
}

fn arb_module() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9]{0,6}".prop_map(|s| format!("m_{}", s)), 0..3)
}

fn arb_kind() -> impl Strategy<Value = RepresentationKind> {
    prop::sample::select(RepresentationKind::ALL.to_vec())
}

fn arb_declaration() -> impl Strategy<Value = Declaration> {
    (arb_type_name(), arb_module(), arb_kind()).prop_map(|(name, module, kind)| {
        Declaration::new(name)
            .with_namespace(Namespace::new(module))
            .with_kind(kind)
    })
}

/// Declarations with distinct names.
fn arb_program() -> impl Strategy<Value = Vec<Declaration>> {
    prop::collection::vec(arb_declaration(), 1..8).prop_map(|decls| {
        let mut seen = BTreeSet::new();
        decls
            .into_iter()
            .filter(|d| seen.insert(d.name.clone()))
            .collect()
    })
}

fn persistence() -> Capabilities {
    Capabilities::new("app").with_persistence(true)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_registration_is_order_independent(
        (original, shuffled) in arb_program().prop_flat_map(|decls| {
            (Just(decls.clone()), Just(decls).prop_shuffle())
        })
    ) {
        let first = generate(&original, &persistence()).unwrap();
        let second = generate(&shuffled, &persistence()).unwrap();
        prop_assert_eq!(first.registration, second.registration);
    }

    #[test]
    fn prop_malformed_declarations_never_emit(
        decls in arb_program(),
        broken in prop::collection::vec(any::<bool>(), 8)
    ) {
        let decls: Vec<Declaration> = decls
            .into_iter()
            .zip(broken.iter().copied())
            .map(|(d, b)| d.with_well_formed(!b))
            .collect();
        let output = generate(&decls, &persistence()).unwrap();

        let malformed: Vec<&Declaration> = decls.iter().filter(|d| !d.well_formed).collect();
        prop_assert_eq!(output.diagnostics.len(), malformed.len());
        for decl in &malformed {
            prop_assert_eq!(output.artifacts_for(&decl.name).count(), 0);
        }
        prop_assert_eq!(output.registration.is_some(), malformed.is_empty());
    }

    #[test]
    fn prop_argument_resolution_is_total(text in ".{0,16}", code in any::<i64>()) {
        let by_name = AttributeArgs::new().with("kind", ArgValue::Str(text.clone()));
        let by_code = AttributeArgs::new().with("kind", ArgValue::Int(code));
        let cast = AttributeArgs::new().with("cast", ArgValue::Ident(text));

        prop_assert!(RepresentationKind::ALL.contains(&IdConfig::from_args(&by_name).kind));
        prop_assert!(RepresentationKind::ALL.contains(&IdConfig::from_args(&by_code).kind));
        let _ = IdConfig::from_args(&cast);
    }
}
