//! Intermediate representation shared by every pipeline stage.
//!
//! Extraction produces [`Declaration`]s, the capability detector produces
//! [`Capabilities`], and the emitters turn both into [`Artifact`]s or
//! [`Diagnostic`]s.

pub mod artifact;
pub mod capability;
pub mod declaration;
pub mod diagnostic;

pub use artifact::{Artifact, ArtifactKind};
pub use capability::{Capabilities, PERSISTENCE_MODULE, SERIALIZATION_MODULE};
pub use declaration::{Declaration, Location, Namespace, OperatorVisibility, RepresentationKind};
pub use diagnostic::{Diagnostic, Severity, MALFORMED_DECLARATION_CODE};
