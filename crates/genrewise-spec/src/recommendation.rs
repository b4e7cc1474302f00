//! Engine output types and the serializable classification report.

use serde::{Deserialize, Serialize};

use crate::facts::FactSet;

/// One engine output: a genre, a graded confidence, and a justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Genre label.
    pub genre: String,
    /// Confidence as a fraction in `[0, 1]`.
    pub confidence: f64,
    /// Human-readable justification naming the attributes that drove it.
    pub reason: String,
    /// Id of the rule that produced this recommendation.
    #[serde(skip)]
    pub rule_id: String,
}

impl Recommendation {
    /// Creates a new recommendation.
    pub fn new(
        rule_id: impl Into<String>,
        genre: impl Into<String>,
        confidence: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            genre: genre.into(),
            confidence,
            reason: reason.into(),
            rule_id: rule_id.into(),
        }
    }

    /// Confidence as a percentage with one decimal (e.g., "66.7%").
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }
}

/// The combined report handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationReport {
    /// The facts the classification was computed from.
    pub attributes: FactSet,
    /// Highest-ranked recommendation, or `null` when nothing matched.
    pub best_match: Option<Recommendation>,
    /// All recommendations in ranked order.
    pub all_recommendations: Vec<Recommendation>,
}

impl ClassificationReport {
    /// Builds a report from facts and an already ranked recommendation list.
    pub fn new(attributes: FactSet, ranked: Vec<Recommendation>) -> Self {
        Self {
            attributes,
            best_match: ranked.first().cloned(),
            all_recommendations: ranked,
        }
    }

    /// Serializes the report to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the report to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
