//! Genrewise Canonical Types
//!
//! This crate provides the vocabulary, fact, rule, and rule book types that the
//! Genrewise inference engine classifies songs with. Rule books are JSON
//! documents that declare attribute vocabularies, weighted genre rules, and
//! named presets.
//!
//! # Overview
//!
//! - **Facts**: a song description is a [`FactSet`] holding at most one value
//!   per [`Attribute`]. Facts are built through a [`FactSetBuilder`], which
//!   drops values outside the vocabulary and rejects conflicting assertions.
//! - **Rules**: a [`Rule`] pairs a genre with weighted [`Condition`] clauses,
//!   a confidence ceiling, and a reason template.
//! - **Rule books**: a [`RuleBook`] bundles vocabulary, settings, rules, and
//!   presets. Loading validates the whole book and refuses it on any error.
//!
//! # Example
//!
//! ```
//! use genrewise_spec::{Attribute, FactError, FactSet, Vocabulary};
//!
//! let vocab = Vocabulary::default();
//! let mut builder = FactSet::builder(&vocab);
//! builder.set(Attribute::Year, 1969)?.set(Attribute::Bpm, "fast")?;
//!
//! // A second, different year is a conflict
//! assert!(builder.set(Attribute::Year, 1970).is_err());
//!
//! let facts = builder.build();
//! assert_eq!(facts.bpm(), Some(135));
//! # Ok::<(), FactError>(())
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error and warning types
//! - [`facts`]: Attributes, fact values, and fact sets
//! - [`preset`]: Named example attribute bundles
//! - [`recommendation`]: Engine output and report types
//! - [`rule`]: Conditions, clauses, rules, and reason templates
//! - [`rulebook`]: Rule book loading and settings
//! - [`validation`]: Rule book validation
//! - [`vocab`]: Attribute vocabularies

pub mod error;
pub mod facts;
pub mod preset;
pub mod recommendation;
pub mod rule;
pub mod rulebook;
pub mod validation;
pub mod vocab;

// Re-export commonly used types at the crate root
pub use error::{
    ErrorCode, FactError, SpecError, ValidationError, ValidationResult, ValidationWarning,
    WarningCode,
};
pub use facts::{Attribute, DroppedFact, FactSet, FactSetBuilder, FactValue};
pub use preset::Preset;
pub use recommendation::{ClassificationReport, Recommendation};
pub use rule::{
    round_confidence, Clause, Condition, ReasonTemplate, Rule, RuleEvaluation, TemplateError,
};
pub use rulebook::{Aggregation, RuleBook, Settings, DEFAULT_MIN_MATCH, FORMAT_VERSION};
pub use validation::{is_valid_rule_id, validate_rulebook};
pub use vocab::{normalize_label, TempoBucket, Vocabulary, YearRange};
