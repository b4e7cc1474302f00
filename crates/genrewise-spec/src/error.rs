//! Error types for rule book validation and fact assembly.

use thiserror::Error;

use crate::facts::Attribute;

/// Error codes for rule book validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Rule book contract errors (R001-R004)
    /// R001: Unsupported format_version
    UnsupportedFormatVersion,
    /// R002: Year range has min > max
    InvalidYearRange,
    /// R003: No tempo buckets declared
    NoTempoBuckets,
    /// R004: Duplicate vocabulary entry
    DuplicateVocabularyEntry,

    // Rule errors (R005-R014)
    /// R005: Invalid rule id format
    InvalidRuleId,
    /// R006: Duplicate rule id
    DuplicateRuleId,
    /// R007: Rule has an empty genre label
    EmptyGenre,
    /// R008: Condition references an undeclared vocal style
    UndeclaredVocalStyle,
    /// R009: Condition references an undeclared instrument
    UndeclaredInstrument,
    /// R010: Condition range has min > max
    InvalidConditionRange,
    /// R011: Confidence outside [0, 1]
    ConfidenceOutOfRange,
    /// R012: Clause weight is not a positive finite number
    InvalidWeight,
    /// R013: min_match outside [0, 1]
    MinMatchOutOfRange,
    /// R014: Reason template uses an unknown placeholder
    UnknownPlaceholder,

    // Preset errors (R015)
    /// R015: Preset is malformed or references undeclared values
    InvalidPreset,

    // Late additions (R016-R017)
    /// R016: Vocabulary label is empty or not in normalized form
    MalformedVocabularyEntry,
    /// R017: settings.max_results is zero
    InvalidMaxResults,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "R001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::UnsupportedFormatVersion => "R001",
            ErrorCode::InvalidYearRange => "R002",
            ErrorCode::NoTempoBuckets => "R003",
            ErrorCode::DuplicateVocabularyEntry => "R004",
            ErrorCode::InvalidRuleId => "R005",
            ErrorCode::DuplicateRuleId => "R006",
            ErrorCode::EmptyGenre => "R007",
            ErrorCode::UndeclaredVocalStyle => "R008",
            ErrorCode::UndeclaredInstrument => "R009",
            ErrorCode::InvalidConditionRange => "R010",
            ErrorCode::ConfidenceOutOfRange => "R011",
            ErrorCode::InvalidWeight => "R012",
            ErrorCode::MinMatchOutOfRange => "R013",
            ErrorCode::UnknownPlaceholder => "R014",
            ErrorCode::InvalidPreset => "R015",
            ErrorCode::MalformedVocabularyEntry => "R016",
            ErrorCode::InvalidMaxResults => "R017",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes for rule book validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Rule has no conditions and always fires
    UnconditionalRule,
    /// W002: Condition can never be satisfied by a valid fact set
    UnreachableCondition,
    /// W003: Reason template does not cite the matched attributes
    ReasonWithoutMatches,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::UnconditionalRule => "W001",
            WarningCode::UnreachableCondition => "W002",
            WarningCode::ReasonWithoutMatches => "W003",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// JSON path to the problematic field (e.g., "rules\[2\].conditions\[0\]").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a JSON path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// JSON path to the problematic field.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning with a JSON path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Top-level error type for rule book operations.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Rule book validation failed with one or more errors.
    #[error("rule book validation failed with {} error(s): {}", .0.len(), first_error(.0))]
    ValidationFailed(Vec<ValidationError>),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn first_error(errors: &[ValidationError]) -> String {
    errors
        .first()
        .map(|e| e.to_string())
        .unwrap_or_default()
}

/// Errors raised while assembling a fact set from a request.
///
/// Out-of-domain values are not errors; they are dropped and reported as
/// [`DroppedFact`](crate::facts::DroppedFact)s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FactError {
    /// The attribute name is not one of the recognized attributes.
    #[error("unknown attribute '{0}' (expected year, bpm, vocals or instruments)")]
    UnknownAttribute(String),

    /// The attribute already holds a different value.
    #[error("conflicting values for {attribute}: '{existing}' vs '{incoming}'")]
    Conflict {
        /// The attribute that was asserted twice.
        attribute: Attribute,
        /// The value already held.
        existing: String,
        /// The value that was rejected.
        incoming: String,
    },
}

/// Result of rule book validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed (no errors).
    pub ok: bool,
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.ok = false;
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        if self.ok {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}
