//! Diagnostics reported for malformed declarations.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::declaration::Location;

/// Identifier of the malformed-declaration diagnostic.
pub const MALFORMED_DECLARATION_CODE: &str = "OID0001";

/// Short title of the malformed-declaration diagnostic.
pub const MALFORMED_DECLARATION_TITLE: &str =
    "opaque id must be a non-nested, non-generic unit struct declared at module scope";

/// Diagnostic category.
pub const MALFORMED_DECLARATION_CATEGORY: &str = "design";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A structured error message anchored at a source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub location: Location,
}

impl Diagnostic {
    /// The diagnostic reported for a declaration that fails a structural check.
    pub fn malformed_declaration(name: &str, location: Location) -> Self {
        Self {
            code: MALFORMED_DECLARATION_CODE.to_string(),
            severity: Severity::Error,
            message: format!(
                "opaque id `{}` must be a non-nested, non-generic unit struct declared at module scope",
                name
            ),
            location,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if self.location.is_known() {
            write!(f, "\n  --> {}", self.location)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_declaration_message() {
        let diagnostic =
            Diagnostic::malformed_declaration("OrderId", Location::new("src/orders.rs", 4, 12));

        assert_eq!(diagnostic.code, "OID0001");
        assert!(diagnostic.is_error());
        assert!(diagnostic.message.contains("`OrderId`"));
        insta::assert_snapshot!(diagnostic.to_string(), @r"
        error[OID0001]: opaque id `OrderId` must be a non-nested, non-generic unit struct declared at module scope
          --> src/orders.rs:4:12
        ");
    }

    #[test]
    fn test_display_without_location() {
        let diagnostic = Diagnostic::malformed_declaration("Id", Location::unknown());
        assert!(!diagnostic.to_string().contains("-->"));
    }

    #[test]
    fn test_serializes_severity_lowercase() {
        let diagnostic = Diagnostic::malformed_declaration("Id", Location::unknown());
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["severity"], "error");
        assert_eq!(json["code"], "OID0001");
    }
}
