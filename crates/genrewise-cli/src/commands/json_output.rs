//! JSON output types for machine-readable CLI output.
//!
//! These types back the `--json` flag of the `validate` command and keep its
//! error and warning records stable for scripts.

use genrewise_spec::{ValidationError, ValidationWarning};
use serde::{Deserialize, Serialize};

/// Error codes for CLI operations.
///
/// Validation errors pass their own codes (R001, ...) through unchanged.
pub mod error_codes {
    /// Rule book file could not be read or parsed
    pub const RULEBOOK_LOAD: &str = "CLI_001";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "R009")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// JSON path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl JsonError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl From<&ValidationError> for JsonError {
    fn from(err: &ValidationError) -> Self {
        let error = JsonError::new(err.code.to_string(), &err.message);
        match err.path {
            Some(ref path) => error.with_path(path),
            None => error,
        }
    }
}

/// A structured warning in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonWarning {
    /// Stable warning code (e.g., "W001")
    pub code: String,
    /// Human-readable warning message
    pub message: String,
    /// JSON path to the problematic field (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl From<&ValidationWarning> for JsonWarning {
    fn from(warn: &ValidationWarning) -> Self {
        Self {
            code: warn.code.to_string(),
            message: warn.message.clone(),
            path: warn.path.clone(),
        }
    }
}

/// JSON output for the `validate` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateOutput {
    /// Whether validation succeeded (no errors)
    pub success: bool,
    /// Where the rule book came from
    pub source: String,
    /// Validation errors
    pub errors: Vec<JsonError>,
    /// Validation warnings
    pub warnings: Vec<JsonWarning>,
    /// Rule count (when the rule book parsed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<usize>,
    /// Preset count (when the rule book parsed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presets: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use genrewise_spec::{ErrorCode, WarningCode};

    #[test]
    fn test_validation_error_to_json() {
        let err = ValidationError::with_path(
            ErrorCode::UndeclaredInstrument,
            "'kazoo' is not a declared instrument",
            "rules[0].conditions[1]",
        );
        let json = JsonError::from(&err);
        assert_eq!(json.code, "R009");
        assert_eq!(json.path.as_deref(), Some("rules[0].conditions[1]"));
    }

    #[test]
    fn test_validation_warning_to_json() {
        let warn = ValidationWarning::with_path(
            WarningCode::UnconditionalRule,
            "always fires",
            "rules[2].conditions",
        );
        let value = serde_json::to_value(JsonWarning::from(&warn)).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"code": "W001", "message": "always fires", "path": "rules[2].conditions"})
        );
    }

    #[test]
    fn test_error_without_path_omits_key() {
        let value = serde_json::to_value(JsonError::new(error_codes::RULEBOOK_LOAD, "oops")).unwrap();
        assert_eq!(value, serde_json::json!({"code": "CLI_001", "message": "oops"}));
    }
}
