//! The rule book: vocabularies, settings, genre rules, and presets.
//!
//! A rule book is loaded once, validated as a whole, and then treated as
//! read-only. Loading fails if any validation error is found; warnings are
//! logged and returned to callers that ask for them.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, ValidationResult, ValidationWarning};
use crate::preset::Preset;
use crate::rule::Rule;
use crate::validation::validate_rulebook;
use crate::vocab::Vocabulary;

/// Current rule book format version.
pub const FORMAT_VERSION: u32 = 1;

/// Default firing threshold (fraction of clause weight satisfied).
pub const DEFAULT_MIN_MATCH: f64 = 0.5;

/// The rule book shipped with the engine.
const BUILTIN_RULEBOOK: &str = include_str!("../rules/default.json");

/// How recommendations that share a genre are merged before ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Keep every recommendation, even for a repeated genre.
    #[default]
    KeepAll,
    /// Keep only the highest-confidence recommendation per genre.
    BestPerGenre,
    /// Merge same-genre recommendations with a noisy-OR of their confidences.
    Combine,
}

impl Aggregation {
    /// Returns the string representation used in rule books.
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::KeepAll => "keep_all",
            Aggregation::BestPerGenre => "best_per_genre",
            Aggregation::Combine => "combine",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep_all" => Ok(Aggregation::KeepAll),
            "best_per_genre" => Ok(Aggregation::BestPerGenre),
            "combine" => Ok(Aggregation::Combine),
            _ => Err(format!(
                "unknown aggregation '{}', expected 'keep_all', 'best_per_genre' or 'combine'",
                s
            )),
        }
    }
}

fn default_min_match() -> f64 {
    DEFAULT_MIN_MATCH
}

/// Engine-wide scoring and ranking settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Default firing threshold for rules without their own `min_match`.
    #[serde(default = "default_min_match")]
    pub min_match: f64,
    /// Same-genre merge policy.
    #[serde(default)]
    pub aggregation: Aggregation,
    /// Keep at most this many recommendations after ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_match: DEFAULT_MIN_MATCH,
            aggregation: Aggregation::default(),
            max_results: None,
        }
    }
}

/// A complete rule book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBook {
    /// Format version (must be [`FORMAT_VERSION`]).
    pub format_version: u32,
    /// Attribute vocabularies.
    pub vocabulary: Vocabulary,
    /// Scoring and ranking settings.
    #[serde(default)]
    pub settings: Settings,
    /// Genre rules in emission order.
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// Named example attribute bundles.
    #[serde(default)]
    pub presets: Vec<Preset>,
}

impl RuleBook {
    /// Creates an empty rule book over `vocabulary`.
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            vocabulary,
            settings: Settings::default(),
            rules: Vec::new(),
            presets: Vec::new(),
        }
    }

    /// Builder method to append a rule.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Builder method to append a preset.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.presets.push(preset);
        self
    }

    /// Builder method to replace the settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Parses a rule book without validating it.
    pub fn parse(json: &str) -> Result<Self, SpecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses and validates a rule book.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let book = Self::parse(json)?;
        book.ensure_valid()?;
        Ok(book)
    }

    /// Reads, parses, and validates a rule book file.
    pub fn load(path: &Path) -> Result<Self, SpecError> {
        let json = std::fs::read_to_string(path)?;
        let book = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            rules = book.rules.len(),
            presets = book.presets.len(),
            "loaded rule book"
        );
        Ok(book)
    }

    /// Returns the built-in rule book.
    pub fn builtin() -> Result<Self, SpecError> {
        let book = Self::from_json(BUILTIN_RULEBOOK)?;
        tracing::debug!(rules = book.rules.len(), "loaded built-in rule book");
        Ok(book)
    }

    /// Runs full validation.
    pub fn validate(&self) -> ValidationResult {
        validate_rulebook(self)
    }

    /// Fails with [`SpecError::ValidationFailed`] if validation finds errors.
    ///
    /// Warnings are logged and returned.
    pub fn ensure_valid(&self) -> Result<Vec<ValidationWarning>, SpecError> {
        let warnings = self
            .validate()
            .into_result()
            .map_err(SpecError::ValidationFailed)?;
        for warning in &warnings {
            tracing::warn!("rule book: {}", warning);
        }
        Ok(warnings)
    }

    /// Looks up a rule by id.
    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Looks up a preset by name, ignoring ASCII case.
    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.is_named(name))
    }

    /// Serializes the rule book to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
