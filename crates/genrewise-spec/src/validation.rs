//! Rule book validation logic.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::preset::Preset;
use crate::rule::{Clause, Condition, ReasonTemplate, Rule};
use crate::rulebook::{RuleBook, FORMAT_VERSION};
use crate::vocab::{normalize_label, Vocabulary};

/// Regex pattern for valid rule ids.
/// Format: starts with lowercase letter, followed by 1-63 lowercase letters, digits, underscores, or hyphens.
const RULE_ID_PATTERN: &str = r"^[a-z][a-z0-9_-]{1,63}$";

static RULE_ID_REGEX: OnceLock<Regex> = OnceLock::new();

fn rule_id_regex() -> &'static Regex {
    RULE_ID_REGEX.get_or_init(|| Regex::new(RULE_ID_PATTERN).expect("invalid regex pattern"))
}

/// Returns true if `id` is a well-formed rule id.
pub fn is_valid_rule_id(id: &str) -> bool {
    rule_id_regex().is_match(id)
}

/// Validates a rule book and returns a validation result.
///
/// # Example
/// ```
/// use genrewise_spec::{Clause, Condition, Rule, RuleBook, Vocabulary};
/// use genrewise_spec::validation::validate_rulebook;
///
/// let book = RuleBook::new(Vocabulary::default()).with_rule(
///     Rule::new("kazoo_folk", "Kazoo Folk", "{matched}").clause(Condition::InstrumentsAny {
///         instruments: vec!["kazoo".to_string()],
///     }),
/// );
///
/// let result = validate_rulebook(&book);
/// assert!(!result.is_ok());
/// assert_eq!(result.errors[0].code.code(), "R009");
/// ```
pub fn validate_rulebook(book: &RuleBook) -> ValidationResult {
    let mut result = ValidationResult::default();

    validate_format_version(book, &mut result);
    validate_vocabulary(&book.vocabulary, &mut result);
    validate_settings(book, &mut result);

    let mut seen_ids = HashSet::new();
    for (index, rule) in book.rules.iter().enumerate() {
        let path = format!("rules[{}]", index);
        if !seen_ids.insert(rule.id.as_str()) {
            result.add_error(ValidationError::with_path(
                ErrorCode::DuplicateRuleId,
                format!("duplicate rule id '{}'", rule.id),
                format!("{}.id", path),
            ));
        }
        validate_rule(rule, &book.vocabulary, &path, &mut result);
    }

    let mut seen_presets = HashSet::new();
    for (index, preset) in book.presets.iter().enumerate() {
        let path = format!("presets[{}]", index);
        if !seen_presets.insert(preset.name.to_lowercase()) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidPreset,
                format!("duplicate preset name '{}'", preset.name),
                format!("{}.name", path),
            ));
        }
        validate_preset(preset, &book.vocabulary, &path, &mut result);
    }

    result
}

fn validate_format_version(book: &RuleBook, result: &mut ValidationResult) {
    if book.format_version != FORMAT_VERSION {
        result.add_error(ValidationError::with_path(
            ErrorCode::UnsupportedFormatVersion,
            format!(
                "format_version must be {}, got {}",
                FORMAT_VERSION, book.format_version
            ),
            "format_version",
        ));
    }
}

fn validate_vocabulary(vocab: &Vocabulary, result: &mut ValidationResult) {
    if vocab.years.min > vocab.years.max {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidYearRange,
            format!(
                "year range min {} exceeds max {}",
                vocab.years.min, vocab.years.max
            ),
            "vocabulary.years",
        ));
    }

    if vocab.tempo_buckets.is_empty() {
        result.add_error(ValidationError::with_path(
            ErrorCode::NoTempoBuckets,
            "tempo_buckets must have at least one entry",
            "vocabulary.tempo_buckets",
        ));
    }

    let mut names = HashSet::new();
    let mut values = HashSet::new();
    for (index, bucket) in vocab.tempo_buckets.iter().enumerate() {
        let path = format!("vocabulary.tempo_buckets[{}]", index);
        if !names.insert(normalize_label(&bucket.name)) {
            result.add_error(ValidationError::with_path(
                ErrorCode::DuplicateVocabularyEntry,
                format!("duplicate tempo bucket name '{}'", bucket.name),
                format!("{}.name", path),
            ));
        }
        if !values.insert(bucket.bpm) {
            result.add_error(ValidationError::with_path(
                ErrorCode::DuplicateVocabularyEntry,
                format!("duplicate tempo bucket value {} BPM", bucket.bpm),
                format!("{}.bpm", path),
            ));
        }
    }

    check_label_list(&vocab.vocal_styles, "vocabulary.vocal_styles", result);
    check_label_list(&vocab.instruments, "vocabulary.instruments", result);
}

/// Labels must be unique and already in normalized form, or facts could never match them.
fn check_label_list(labels: &[String], path: &str, result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for (index, label) in labels.iter().enumerate() {
        if !seen.insert(label.as_str()) {
            result.add_error(ValidationError::with_path(
                ErrorCode::DuplicateVocabularyEntry,
                format!("duplicate entry '{}'", label),
                format!("{}[{}]", path, index),
            ));
        } else if label.is_empty() || normalize_label(label) != *label {
            result.add_error(ValidationError::with_path(
                ErrorCode::MalformedVocabularyEntry,
                format!(
                    "entry '{}' is not in normalized form (expected '{}')",
                    label,
                    normalize_label(label)
                ),
                format!("{}[{}]", path, index),
            ));
        }
    }
}

fn validate_settings(book: &RuleBook, result: &mut ValidationResult) {
    check_unit_interval(
        book.settings.min_match,
        ErrorCode::MinMatchOutOfRange,
        "min_match",
        "settings.min_match",
        result,
    );
    if book.settings.max_results == Some(0) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidMaxResults,
            "max_results must be at least 1 (omit it to keep every recommendation)",
            "settings.max_results",
        ));
    }
}

fn check_unit_interval(
    value: f64,
    code: ErrorCode,
    name: &str,
    path: &str,
    result: &mut ValidationResult,
) {
    if !(0.0..=1.0).contains(&value) {
        result.add_error(ValidationError::with_path(
            code,
            format!("{} must be in [0, 1], got {}", name, value),
            path,
        ));
    }
}

fn validate_rule(rule: &Rule, vocab: &Vocabulary, path: &str, result: &mut ValidationResult) {
    if !is_valid_rule_id(&rule.id) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidRuleId,
            format!(
                "rule id must match pattern '{}', got '{}'",
                RULE_ID_PATTERN, rule.id
            ),
            format!("{}.id", path),
        ));
    }

    if rule.genre.trim().is_empty() {
        result.add_error(ValidationError::with_path(
            ErrorCode::EmptyGenre,
            "genre must not be empty",
            format!("{}.genre", path),
        ));
    }

    check_unit_interval(
        rule.confidence,
        ErrorCode::ConfidenceOutOfRange,
        "confidence",
        &format!("{}.confidence", path),
        result,
    );
    if let Some(min_match) = rule.min_match {
        check_unit_interval(
            min_match,
            ErrorCode::MinMatchOutOfRange,
            "min_match",
            &format!("{}.min_match", path),
            result,
        );
    }

    match ReasonTemplate::parse(&rule.reason) {
        Ok(template) => {
            if !template.cites_matches() {
                result.add_warning(ValidationWarning::with_path(
                    WarningCode::ReasonWithoutMatches,
                    "reason does not use {matched}, so it cannot name the attributes that matched",
                    format!("{}.reason", path),
                ));
            }
        }
        Err(e) => {
            result.add_error(ValidationError::with_path(
                ErrorCode::UnknownPlaceholder,
                e.to_string(),
                format!("{}.reason", path),
            ));
        }
    }

    if rule.conditions.is_empty() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::UnconditionalRule,
            format!("rule '{}' has no conditions and fires for every request", rule.id),
            format!("{}.conditions", path),
        ));
    }

    for (index, clause) in rule.conditions.iter().enumerate() {
        validate_clause(
            clause,
            vocab,
            &format!("{}.conditions[{}]", path, index),
            result,
        );
    }
}

fn validate_clause(clause: &Clause, vocab: &Vocabulary, path: &str, result: &mut ValidationResult) {
    if !clause.weight.is_finite() || clause.weight <= 0.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidWeight,
            format!("weight must be a positive number, got {}", clause.weight),
            format!("{}.weight", path),
        ));
    }

    for style in clause.condition.vocal_styles() {
        if !vocab.is_vocal_style(style) {
            result.add_error(ValidationError::with_path(
                ErrorCode::UndeclaredVocalStyle,
                format!("'{}' is not a declared vocal style", style),
                path,
            ));
        }
    }
    for instrument in clause.condition.instruments() {
        if !vocab.is_instrument(instrument) {
            result.add_error(ValidationError::with_path(
                ErrorCode::UndeclaredInstrument,
                format!("'{}' is not a declared instrument", instrument),
                path,
            ));
        }
    }

    match &clause.condition {
        Condition::YearBetween { min, max } => {
            if min > max {
                add_range_error(*min as i64, *max as i64, path, result);
            } else if !vocab.years.overlaps(*min, *max) {
                add_unreachable(
                    format!(
                        "years {}-{} lie outside the vocabulary range {}-{}",
                        min, max, vocab.years.min, vocab.years.max
                    ),
                    path,
                    result,
                );
            }
        }
        Condition::TempoBetween { min, max } => {
            if min > max {
                add_range_error(*min as i64, *max as i64, path, result);
            } else if !vocab.has_bucket_between(*min, *max) {
                add_unreachable(
                    format!("no tempo bucket lies within {}-{} BPM", min, max),
                    path,
                    result,
                );
            }
        }
        Condition::VocalsIn { styles } if styles.is_empty() => {
            add_unreachable("empty style list can never match".to_string(), path, result);
        }
        Condition::InstrumentsAny { instruments } if instruments.is_empty() => {
            add_unreachable(
                "empty instrument list can never match".to_string(),
                path,
                result,
            );
        }
        _ => {}
    }
}

fn add_range_error(min: i64, max: i64, path: &str, result: &mut ValidationResult) {
    result.add_error(ValidationError::with_path(
        ErrorCode::InvalidConditionRange,
        format!("range min {} exceeds max {}", min, max),
        path,
    ));
}

fn add_unreachable(message: String, path: &str, result: &mut ValidationResult) {
    result.add_warning(ValidationWarning::with_path(
        WarningCode::UnreachableCondition,
        message,
        path,
    ));
}

fn validate_preset(preset: &Preset, vocab: &Vocabulary, path: &str, result: &mut ValidationResult) {
    if preset.name.trim().is_empty() {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidPreset,
            "preset name must not be empty",
            format!("{}.name", path),
        ));
    }
    if let Some(year) = preset.year {
        if !vocab.years.contains(year) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidPreset,
                format!(
                    "year {} is outside {}-{}",
                    year, vocab.years.min, vocab.years.max
                ),
                format!("{}.year", path),
            ));
        }
    }
    if let Some(ref vocals) = preset.vocals {
        if !vocab.is_vocal_style(&normalize_label(vocals)) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidPreset,
                format!("'{}' is not a declared vocal style", vocals),
                format!("{}.vocals", path),
            ));
        }
    }
    for (index, instrument) in preset.instruments.iter().flatten().enumerate() {
        if !vocab.is_instrument(&normalize_label(instrument)) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidPreset,
                format!("'{}' is not a declared instrument", instrument),
                format!("{}.instruments[{}]", path, index),
            ));
        }
    }
}
