//! Reason templates: `"{matched} indicate {genre}"`.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::RuleEvaluation;

/// Placeholders a reason template may use.
pub const PLACEHOLDERS: &[&str] = &["matched", "missed", "genre", "confidence"];

/// Separator between matched (or missed) clause labels.
const LABEL_SEPARATOR: &str = " + ";

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\{([A-Za-z0-9_]*)\}").expect("invalid regex pattern"))
}

/// Errors in a reason template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template names a placeholder that does not exist.
    #[error("unknown placeholder '{{{0}}}' (expected one of: matched, missed, genre, confidence)")]
    UnknownPlaceholder(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Matched,
    Missed,
    Genre,
    Confidence,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(Placeholder),
}

/// A parsed reason template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonTemplate {
    segments: Vec<Segment>,
}

impl ReasonTemplate {
    /// Parses a template, rejecting unknown placeholders.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in placeholder_regex().captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(template[last..whole.start()].to_string()));
            }
            let placeholder = match name.as_str() {
                "matched" => Placeholder::Matched,
                "missed" => Placeholder::Missed,
                "genre" => Placeholder::Genre,
                "confidence" => Placeholder::Confidence,
                other => return Err(TemplateError::UnknownPlaceholder(other.to_string())),
            };
            segments.push(Segment::Placeholder(placeholder));
            last = whole.end();
        }
        if last < template.len() {
            segments.push(Segment::Literal(template[last..].to_string()));
        }

        Ok(Self { segments })
    }

    /// Returns true if the template cites the matched clause labels.
    pub fn cites_matches(&self) -> bool {
        self.segments
            .iter()
            .any(|s| *s == Segment::Placeholder(Placeholder::Matched))
    }

    /// Renders the reason for one rule evaluation.
    pub fn render(&self, genre: &str, evaluation: &RuleEvaluation) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(Placeholder::Matched) => {
                    out.push_str(&join_labels(&evaluation.matched))
                }
                Segment::Placeholder(Placeholder::Missed) => {
                    out.push_str(&join_labels(&evaluation.missed))
                }
                Segment::Placeholder(Placeholder::Genre) => out.push_str(genre),
                Segment::Placeholder(Placeholder::Confidence) => {
                    out.push_str(&format!("{:.1}%", evaluation.score * 100.0))
                }
            }
        }
        out
    }
}

fn join_labels(labels: &[String]) -> String {
    if labels.is_empty() {
        "nothing".to_string()
    } else {
        labels.join(LABEL_SEPARATOR)
    }
}
