//! Condition and rule evaluation against a fact set.

use crate::facts::FactSet;

use super::{Condition, Rule};

/// Tolerance for comparing a satisfied fraction with a threshold.
const FRACTION_EPSILON: f64 = 1e-9;

/// Rounds a confidence to 4 decimal places so equal scores compare equal.
pub fn round_confidence(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

impl Condition {
    /// Tests this condition against `facts`. Absent attributes fail.
    pub fn evaluate(&self, facts: &FactSet) -> bool {
        match self {
            Condition::YearBetween { min, max } => {
                facts.year().is_some_and(|y| (*min..=*max).contains(&y))
            }
            Condition::TempoBetween { min, max } => {
                facts.bpm().is_some_and(|b| (*min..=*max).contains(&b))
            }
            Condition::VocalsIn { styles } => facts
                .vocals()
                .is_some_and(|v| styles.iter().any(|s| s == v)),
            Condition::InstrumentsAny { instruments } => facts
                .instruments()
                .is_some_and(|set| instruments.iter().any(|i| set.contains(i))),
            Condition::InstrumentsAll { instruments } => facts
                .instruments()
                .is_some_and(|set| instruments.iter().all(|i| set.contains(i))),
            Condition::InstrumentsExclude { instruments } => facts
                .instruments()
                .is_some_and(|set| !instruments.iter().any(|i| set.contains(i))),
            Condition::NoInstruments => facts.instruments().is_some_and(|set| set.is_empty()),
        }
    }
}

/// The outcome of scoring one rule against one fact set.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEvaluation {
    /// Labels of satisfied clauses, in rule order.
    pub matched: Vec<String>,
    /// Labels of unsatisfied clauses, in rule order.
    pub missed: Vec<String>,
    /// Total weight of satisfied clauses.
    pub satisfied_weight: f64,
    /// Satisfied weight over total weight (1.0 for a rule with no clauses).
    pub fraction: f64,
    /// Graded confidence: rule confidence scaled by `fraction`, rounded.
    pub score: f64,
    unconditional: bool,
}

impl RuleEvaluation {
    /// Returns true if the rule fires at the given threshold.
    ///
    /// A rule with no clauses always fires. Otherwise at least one clause
    /// must hold and the satisfied fraction must reach `min_match`.
    pub fn fires(&self, min_match: f64) -> bool {
        if self.unconditional {
            return true;
        }
        self.satisfied_weight > 0.0 && self.fraction + FRACTION_EPSILON >= min_match
    }
}

impl Rule {
    /// Scores this rule against `facts`.
    pub fn evaluate(&self, facts: &FactSet) -> RuleEvaluation {
        let mut matched = Vec::new();
        let mut missed = Vec::new();
        let mut satisfied_weight = 0.0;

        for clause in &self.conditions {
            if clause.condition.evaluate(facts) {
                satisfied_weight += clause.weight;
                matched.push(clause.label());
            } else {
                missed.push(clause.label());
            }
        }

        let total = self.total_weight();
        let unconditional = self.conditions.is_empty();
        let fraction = if unconditional || total <= 0.0 {
            1.0
        } else {
            satisfied_weight / total
        };

        RuleEvaluation {
            matched,
            missed,
            satisfied_weight,
            fraction,
            score: round_confidence(self.confidence * fraction),
            unconditional,
        }
    }

    /// The threshold this rule fires at, given the rule book default.
    pub fn effective_min_match(&self, default: f64) -> f64 {
        self.min_match.unwrap_or(default)
    }
}
