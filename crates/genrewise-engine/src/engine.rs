//! The inference engine: scores every rule against a fact set.

use std::sync::Arc;
use std::time::{Duration, Instant};

use genrewise_spec::{
    ErrorCode, FactSet, ReasonTemplate, Recommendation, RuleBook, SpecError, ValidationError,
};
use serde::Serialize;

use crate::error::QueryError;
use crate::ranking::{rank, Ranking};

/// Per-rule diagnostic trace produced by [`InferenceEngine::evaluate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleTrace {
    /// Rule id.
    pub rule_id: String,
    /// Genre the rule recommends.
    pub genre: String,
    /// Labels of satisfied clauses.
    pub matched: Vec<String>,
    /// Labels of unsatisfied clauses.
    pub missed: Vec<String>,
    /// Satisfied clause weight over total clause weight.
    pub fraction: f64,
    /// The threshold the rule fires at.
    pub min_match: f64,
    /// Graded confidence the rule would emit.
    pub score: f64,
    /// Whether the rule fired.
    pub fired: bool,
}

/// Classifies fact sets against a validated rule book.
///
/// The engine holds no per-request state: every call takes its facts by
/// reference and returns fresh results. Clones share the rule book.
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    book: Arc<RuleBook>,
    templates: Arc<[ReasonTemplate]>,
}

impl InferenceEngine {
    /// Creates an engine, validating the rule book first.
    pub fn new(book: RuleBook) -> Result<Self, SpecError> {
        Self::from_shared(Arc::new(book))
    }

    /// Creates an engine over the built-in rule book.
    pub fn builtin() -> Result<Self, SpecError> {
        Self::new(RuleBook::builtin()?)
    }

    /// Creates an engine over a shared rule book, validating it first.
    pub fn from_shared(book: Arc<RuleBook>) -> Result<Self, SpecError> {
        book.ensure_valid()?;

        let templates = book
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                ReasonTemplate::parse(&rule.reason).map_err(|e| {
                    ValidationError::with_path(
                        ErrorCode::UnknownPlaceholder,
                        e.to_string(),
                        format!("rules[{}].reason", index),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SpecError::ValidationFailed(vec![e]))?;

        Ok(Self {
            book,
            templates: templates.into(),
        })
    }

    /// The rule book this engine evaluates.
    pub fn rulebook(&self) -> &RuleBook {
        &self.book
    }

    /// Returns the shared handle to the rule book.
    pub fn shared_rulebook(&self) -> Arc<RuleBook> {
        Arc::clone(&self.book)
    }

    /// Returns every fired rule's recommendation, in rule book order.
    pub fn classify(&self, facts: &FactSet) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();
        for index in 0..self.book.rules.len() {
            if let Some(rec) = self.fire(index, facts) {
                recommendations.push(rec);
            }
        }
        recommendations
    }

    /// Like [`classify`](Self::classify), but gives up once `budget` has
    /// elapsed. The deadline is checked between rules.
    pub fn classify_within(
        &self,
        facts: &FactSet,
        budget: Duration,
    ) -> Result<Vec<Recommendation>, QueryError> {
        let deadline = Instant::now() + budget;
        let total = self.book.rules.len();
        let mut recommendations = Vec::new();

        for index in 0..total {
            if Instant::now() >= deadline {
                tracing::warn!(evaluated = index, total, "classification time budget exceeded");
                return Err(QueryError::TimeBudgetExceeded {
                    budget,
                    evaluated: index,
                    total,
                });
            }
            if let Some(rec) = self.fire(index, facts) {
                recommendations.push(rec);
            }
        }

        Ok(recommendations)
    }

    /// Classifies and ranks per the rule book settings.
    pub fn recommend(&self, facts: &FactSet) -> Ranking {
        rank(self.classify(facts), &self.book.settings)
    }

    /// Traces every rule against `facts`, fired or not.
    pub fn evaluate(&self, facts: &FactSet) -> Vec<RuleTrace> {
        self.book
            .rules
            .iter()
            .map(|rule| {
                let evaluation = rule.evaluate(facts);
                let min_match = rule.effective_min_match(self.book.settings.min_match);
                RuleTrace {
                    rule_id: rule.id.clone(),
                    genre: rule.genre.clone(),
                    fired: evaluation.fires(min_match),
                    fraction: evaluation.fraction,
                    min_match,
                    score: evaluation.score,
                    matched: evaluation.matched,
                    missed: evaluation.missed,
                }
            })
            .collect()
    }

    fn fire(&self, index: usize, facts: &FactSet) -> Option<Recommendation> {
        let rule = &self.book.rules[index];
        let evaluation = rule.evaluate(facts);
        let min_match = rule.effective_min_match(self.book.settings.min_match);
        let fired = evaluation.fires(min_match);

        tracing::debug!(
            rule = %rule.id,
            fraction = evaluation.fraction,
            score = evaluation.score,
            fired,
            "evaluated rule"
        );

        if !fired {
            return None;
        }
        let reason = self.templates[index].render(&rule.genre, &evaluation);
        Some(Recommendation::new(
            rule.id.as_str(),
            rule.genre.as_str(),
            evaluation.score,
            reason,
        ))
    }
}
