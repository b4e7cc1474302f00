//! Request/answer façade over the inference engine.
//!
//! A [`Session`] turns a sparse [`Request`] into a fact set, classifies it,
//! and ranks the result. Facts live only inside one [`Session::submit`] call,
//! so nothing from one request can reach the next, whether it succeeded or
//! failed.

use std::time::Duration;

use genrewise_spec::{
    ClassificationReport, DroppedFact, FactSet, FactValue, Recommendation, RuleBook, SpecError,
};

use crate::engine::InferenceEngine;
use crate::error::QueryError;
use crate::ranking::{rank, Ranking};

/// A sparse set of attribute assertions, plus an optional preset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    facts: Vec<(String, FactValue)>,
    preset: Option<String>,
}

impl Request {
    /// Creates an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add an attribute assertion.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder method to select a preset.
    pub fn with_preset(mut self, name: impl Into<String>) -> Self {
        self.preset = Some(name.into());
        self
    }

    /// Adds an attribute assertion.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FactValue>) {
        self.facts.push((name.into(), value.into()));
    }

    /// Attribute assertions in submission order.
    pub fn facts(&self) -> &[(String, FactValue)] {
        &self.facts
    }

    /// The selected preset name.
    pub fn preset(&self) -> Option<&str> {
        self.preset.as_deref()
    }
}

/// How a request ended, short of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// At least one rule fired.
    Matched(Ranking),
    /// No rule fired.
    NoMatch,
}

/// The answer to one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    facts: FactSet,
    outcome: Outcome,
    dropped: Vec<DroppedFact>,
}

impl Answer {
    /// The facts the request resolved to.
    pub fn facts(&self) -> &FactSet {
        &self.facts
    }

    /// Whether any rule fired, with the ranking if so.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Values dropped for lying outside their vocabulary.
    pub fn dropped(&self) -> &[DroppedFact] {
        &self.dropped
    }

    /// Returns true if no rule fired.
    pub fn is_no_match(&self) -> bool {
        matches!(self.outcome, Outcome::NoMatch)
    }

    /// The highest-ranked recommendation.
    pub fn best(&self) -> Option<&Recommendation> {
        match &self.outcome {
            Outcome::Matched(ranking) => ranking.best(),
            Outcome::NoMatch => None,
        }
    }

    /// All recommendations in ranked order (empty on no match).
    pub fn recommendations(&self) -> &[Recommendation] {
        match &self.outcome {
            Outcome::Matched(ranking) => ranking.all(),
            Outcome::NoMatch => &[],
        }
    }

    /// Builds the serializable report.
    pub fn report(&self) -> ClassificationReport {
        ClassificationReport::new(self.facts.clone(), self.recommendations().to_vec())
    }
}

/// Answers classification requests against one rule book.
#[derive(Debug, Clone)]
pub struct Session {
    engine: InferenceEngine,
    time_budget: Option<Duration>,
}

impl Session {
    /// Creates a session with no time budget.
    pub fn new(engine: InferenceEngine) -> Self {
        Self {
            engine,
            time_budget: None,
        }
    }

    /// Creates a session over `book`, validating it first.
    pub fn from_rulebook(book: RuleBook) -> Result<Self, SpecError> {
        Ok(Self::new(InferenceEngine::new(book)?))
    }

    /// Creates a session over the built-in rule book.
    pub fn builtin() -> Result<Self, SpecError> {
        Ok(Self::new(InferenceEngine::builtin()?))
    }

    /// Builder method to bound rule evaluation time per request.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// The engine answering this session's requests.
    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    /// The rule book behind the engine.
    pub fn rulebook(&self) -> &RuleBook {
        self.engine.rulebook()
    }

    /// Resolves a request to a fact set without classifying it.
    ///
    /// Explicit assertions are applied first; a preset then fills only the
    /// attributes still absent.
    pub fn resolve(&self, request: &Request) -> Result<(FactSet, Vec<DroppedFact>), QueryError> {
        let book = self.rulebook();
        let mut builder = FactSet::builder(&book.vocabulary);

        for (name, value) in request.facts() {
            builder.set_named(name, value.clone())?;
        }

        if let Some(name) = request.preset() {
            let preset = book
                .preset(name)
                .ok_or_else(|| QueryError::UnknownPreset(name.to_string()))?;
            preset.apply(&mut builder, &book.vocabulary);
        }

        Ok(builder.finish())
    }

    /// Answers one request.
    pub fn submit(&self, request: &Request) -> Result<Answer, QueryError> {
        let (facts, dropped) = self.resolve(request)?;

        let recommendations = match self.time_budget {
            Some(budget) => self.engine.classify_within(&facts, budget)?,
            None => self.engine.classify(&facts),
        };
        let ranking = rank(recommendations, &self.rulebook().settings);

        tracing::debug!(
            attributes = facts.len(),
            dropped = dropped.len(),
            recommendations = ranking.len(),
            "answered request"
        );

        let outcome = if ranking.is_empty() {
            Outcome::NoMatch
        } else {
            Outcome::Matched(ranking)
        };

        Ok(Answer {
            facts,
            outcome,
            dropped,
        })
    }
}
