//! Genre rules: weighted attribute conditions plus an explanation template.
//!
//! Rules are plain data loaded from a rule book. A rule lists clauses; each
//! clause wraps one [`Condition`] with a weight and a label. Evaluating a rule
//! against a fact set yields the fraction of clause weight satisfied, which
//! becomes the graded confidence of the genre.

mod evaluate;
mod template;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use evaluate::{round_confidence, RuleEvaluation};
pub use template::{ReasonTemplate, TemplateError, PLACEHOLDERS};

/// A single test over one attribute of a fact set.
///
/// A condition over an absent attribute is never satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Release year within `[min, max]`.
    YearBetween {
        /// Earliest year (inclusive).
        min: i32,
        /// Latest year (inclusive).
        max: i32,
    },
    /// Tempo bucket value within `[min, max]` BPM.
    TempoBetween {
        /// Lowest BPM (inclusive).
        min: u32,
        /// Highest BPM (inclusive).
        max: u32,
    },
    /// Vocal style is one of `styles`.
    VocalsIn {
        /// Accepted vocal styles.
        styles: Vec<String>,
    },
    /// Instrument set shares at least one label with `instruments`.
    InstrumentsAny {
        /// Instruments of which at least one must be present.
        instruments: Vec<String>,
    },
    /// Instrument set contains every label in `instruments`.
    InstrumentsAll {
        /// Instruments that must all be present.
        instruments: Vec<String>,
    },
    /// Instrument set is known and contains none of `instruments`.
    InstrumentsExclude {
        /// Instruments that must be absent.
        instruments: Vec<String>,
    },
    /// Instrument set is known and empty.
    NoInstruments,
}

impl Condition {
    /// Vocal styles this condition mentions.
    pub fn vocal_styles(&self) -> &[String] {
        match self {
            Condition::VocalsIn { styles } => styles,
            _ => &[],
        }
    }

    /// Instruments this condition mentions.
    pub fn instruments(&self) -> &[String] {
        match self {
            Condition::InstrumentsAny { instruments }
            | Condition::InstrumentsAll { instruments }
            | Condition::InstrumentsExclude { instruments } => instruments,
            _ => &[],
        }
    }

    /// Default human-readable label used in reasons when a clause has none.
    pub fn default_label(&self) -> String {
        match self {
            Condition::YearBetween { min, max } => format!("released {}-{}", min, max),
            Condition::TempoBetween { min, max } => format!("tempo {}-{} BPM", min, max),
            Condition::VocalsIn { styles } => {
                format!("{} vocals", join_words(styles, "or"))
            }
            Condition::InstrumentsAny { instruments } => join_words(instruments, "or"),
            Condition::InstrumentsAll { instruments } => join_words(instruments, "and"),
            Condition::InstrumentsExclude { instruments } => {
                format!("no {}", join_words(instruments, "or"))
            }
            Condition::NoInstruments => "no instruments".to_string(),
        }
    }
}

/// Joins labels as prose, turning `acoustic_guitar` into `acoustic guitar`.
fn join_words(labels: &[String], conjunction: &str) -> String {
    let words: Vec<String> = labels.iter().map(|l| l.replace('_', " ")).collect();
    match words.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} {} {}", init.join(", "), conjunction, last),
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::YearBetween { min, max } => write!(f, "year_between({}, {})", min, max),
            Condition::TempoBetween { min, max } => write!(f, "tempo_between({}, {})", min, max),
            Condition::VocalsIn { styles } => write!(f, "vocals_in({})", styles.join(", ")),
            Condition::InstrumentsAny { instruments } => {
                write!(f, "instruments_any({})", instruments.join(", "))
            }
            Condition::InstrumentsAll { instruments } => {
                write!(f, "instruments_all({})", instruments.join(", "))
            }
            Condition::InstrumentsExclude { instruments } => {
                write!(f, "instruments_exclude({})", instruments.join(", "))
            }
            Condition::NoInstruments => write!(f, "no_instruments"),
        }
    }
}

fn default_weight() -> f64 {
    1.0
}

fn default_confidence() -> f64 {
    1.0
}

/// A condition with its scoring weight and explanation label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    /// The attribute test.
    #[serde(flatten)]
    pub condition: Condition,
    /// Relative weight of this clause in the rule's score.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Label cited in reasons (defaults to the condition's own label).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Clause {
    /// Creates a clause with weight 1.0 and the default label.
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            weight: default_weight(),
            label: None,
        }
    }

    /// Builder method to set the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Builder method to set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label cited in reasons.
    pub fn label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.condition.default_label())
    }
}

impl From<Condition> for Clause {
    fn from(condition: Condition) -> Self {
        Clause::new(condition)
    }
}

/// A named genre rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule identifier (e.g., "calypso_pop").
    pub id: String,
    /// Genre label emitted when the rule fires.
    pub genre: String,
    /// Clauses scored against the fact set. An empty list always fires.
    #[serde(default)]
    pub conditions: Vec<Clause>,
    /// Confidence reached when every clause is satisfied, in `[0, 1]`.
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    /// Minimum satisfied-weight fraction for the rule to fire.
    /// Falls back to the rule book's `settings.min_match`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_match: Option<f64>,
    /// Reason template (see [`PLACEHOLDERS`]).
    pub reason: String,
}

impl Rule {
    /// Creates a rule with no clauses, full confidence, and the given reason.
    pub fn new(id: impl Into<String>, genre: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            genre: genre.into(),
            conditions: Vec::new(),
            confidence: default_confidence(),
            min_match: None,
            reason: reason.into(),
        }
    }

    /// Builder method to add a clause.
    pub fn clause(mut self, clause: impl Into<Clause>) -> Self {
        self.conditions.push(clause.into());
        self
    }

    /// Builder method to set the full-match confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Builder method to set the firing threshold.
    pub fn with_min_match(mut self, min_match: f64) -> Self {
        self.min_match = Some(min_match);
        self
    }

    /// Sum of all clause weights.
    pub fn total_weight(&self) -> f64 {
        self.conditions.iter().map(|c| c.weight).sum()
    }
}
