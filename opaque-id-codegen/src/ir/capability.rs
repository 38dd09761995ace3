//! Capability record: which optional integrations the host build links.

use serde::{Deserialize, Serialize};

/// Well-known module name whose presence enables the serialization artifact.
pub const SERIALIZATION_MODULE: &str = "serde";

/// Well-known module name whose presence enables the persistence artifacts.
pub const PERSISTENCE_MODULE: &str = "redb";

/// Snapshot of the host build environment, taken once per pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// The serialization integration is linked.
    pub serialization: bool,
    /// The persistence integration is linked.
    pub persistence: bool,
    /// Root name of the host project, used for the registration artifact.
    pub root_name: String,
}

impl Capabilities {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            serialization: false,
            persistence: false,
            root_name: root_name.into(),
        }
    }

    pub fn with_serialization(mut self, enabled: bool) -> Self {
        self.serialization = enabled;
        self
    }

    pub fn with_persistence(mut self, enabled: bool) -> Self {
        self.persistence = enabled;
        self
    }
}
