//! Pass driver.
//!
//! One pass runs two independent paths over the same declarations:
//! the per-declaration path (validate, then emit or diagnose) and the
//! aggregation path. Per-declaration work runs in parallel; results are
//! collected in input order before anything is handed back, so output
//! is deterministic regardless of scheduling.

use rayon::prelude::*;
use tracing::{debug, info_span};

use crate::aggregate::aggregate;
use crate::emit::emit_artifacts;
use crate::error::GeneratorResult;
use crate::ir::{Artifact, Capabilities, Declaration, Diagnostic};
use crate::validate::{validate, Verdict};

/// Everything one pass produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOutput {
    /// Per-declaration artifacts, grouped by declaration in input order.
    pub artifacts: Vec<Artifact>,
    /// The registration artifact, when the program qualifies for one.
    pub registration: Option<Artifact>,
    /// One diagnostic per malformed declaration, in input order.
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutput {
    /// Per-declaration artifacts followed by the registration artifact.
    pub fn all_artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().chain(self.registration.iter())
    }

    /// Artifacts produced for one declaration name.
    pub fn artifacts_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Artifact> + 'a {
        self.artifacts
            .iter()
            .filter(move |artifact| artifact.declaring_name == name)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

enum Outcome {
    Emitted(Vec<Artifact>),
    Rejected(Diagnostic),
}

/// Runs generation passes under a fixed set of capabilities.
#[derive(Debug, Clone)]
pub struct Generator {
    caps: Capabilities,
}

impl Generator {
    pub fn new(caps: Capabilities) -> Self {
        Self { caps }
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    /// Run one pass over every declaration of a program.
    #[tracing::instrument(skip_all, fields(declarations = declarations.len(), root = %self.caps.root_name))]
    pub fn run(&self, declarations: &[Declaration]) -> GeneratorResult<GenerationOutput> {
        let outcomes = declarations
            .par_iter()
            .map(|declaration| self.run_one(declaration))
            .collect::<GeneratorResult<Vec<_>>>()?;

        let mut output = GenerationOutput::default();
        for outcome in outcomes {
            match outcome {
                Outcome::Emitted(artifacts) => output.artifacts.extend(artifacts),
                Outcome::Rejected(diagnostic) => output.diagnostics.push(diagnostic),
            }
        }

        output.registration = aggregate(declarations, &self.caps)?;

        debug!(
            artifacts = output.artifacts.len(),
            diagnostics = output.diagnostics.len(),
            registration = output.registration.is_some(),
            "pass complete"
        );
        Ok(output)
    }

    fn run_one(&self, declaration: &Declaration) -> GeneratorResult<Outcome> {
        let _span = info_span!("declaration", name = %declaration.name).entered();
        match validate(declaration) {
            Verdict::Emit => emit_artifacts(declaration, &self.caps).map(Outcome::Emitted),
            Verdict::Reject(diagnostic) => Ok(Outcome::Rejected(diagnostic)),
        }
    }
}

/// Run one pass with the given capabilities.
pub fn generate(
    declarations: &[Declaration],
    caps: &Capabilities,
) -> GeneratorResult<GenerationOutput> {
    Generator::new(caps.clone()).run(declarations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ArtifactKind, RepresentationKind};

    #[test]
    fn test_empty_program() {
        let output = generate(&[], &Capabilities::new("app").with_persistence(true)).unwrap();
        assert_eq!(output, GenerationOutput::default());
        assert!(!output.has_errors());
    }

    #[test]
    fn test_artifacts_grouped_in_input_order() {
        let decls = vec![
            Declaration::new("Zeta").with_kind(RepresentationKind::Integer32),
            Declaration::new("Alpha"),
        ];
        let caps = Capabilities::new("app").with_serialization(true);
        let output = generate(&decls, &caps).unwrap();

        let hints: Vec<String> = output.artifacts.iter().map(Artifact::hint_name).collect();
        assert_eq!(
            hints,
            vec![
                "Zeta.core",
                "Zeta.jsonConverter",
                "Alpha.core",
                "Alpha.jsonConverter"
            ]
        );
    }

    #[test]
    fn test_malformed_declaration_gets_diagnostic_only() {
        let decls = vec![
            Declaration::new("Good"),
            Declaration::new("Bad").with_well_formed(false),
        ];
        let caps = Capabilities::new("app").with_persistence(true);
        let output = generate(&decls, &caps).unwrap();

        assert_eq!(output.diagnostics.len(), 1);
        assert!(output.has_errors());
        assert_eq!(output.artifacts_for("Bad").count(), 0);
        assert_eq!(output.artifacts_for("Good").count(), 3);
        assert!(output.registration.is_none());
    }

    #[test]
    fn test_all_artifacts_ends_with_registration() {
        let caps = Capabilities::new("app").with_persistence(true);
        let output = generate(&[Declaration::new("OrderId")], &caps).unwrap();
        let last = output.all_artifacts().last().unwrap();
        assert_eq!(last.kind, ArtifactKind::Registration);
    }

    #[test]
    fn test_invalid_identifier_aborts_pass() {
        let caps = Capabilities::new("app");
        assert!(generate(&[Declaration::new("not an ident")], &caps).is_err());
    }
}
