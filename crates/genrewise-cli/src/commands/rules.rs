//! Rules command implementation

use anyhow::Result;
use colored::Colorize;
use genrewise_spec::Rule;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::config::load_rulebook;

/// JSON record for one rule.
#[derive(Debug, Serialize)]
struct RuleEntry<'a> {
    id: &'a str,
    genre: &'a str,
    confidence: f64,
    min_match: f64,
    clauses: Vec<ClauseEntry>,
}

#[derive(Debug, Serialize)]
struct ClauseEntry {
    label: String,
    condition: String,
    weight: f64,
}

fn entry(rule: &Rule, default_min_match: f64) -> RuleEntry<'_> {
    RuleEntry {
        id: &rule.id,
        genre: &rule.genre,
        confidence: rule.confidence,
        min_match: rule.effective_min_match(default_min_match),
        clauses: rule
            .conditions
            .iter()
            .map(|c| ClauseEntry {
                label: c.label(),
                condition: c.condition.to_string(),
                weight: c.weight,
            })
            .collect(),
    }
}

/// Run the rules command
pub fn run(rules: Option<&Path>, json: bool) -> Result<ExitCode> {
    let book = load_rulebook(rules)?;
    let default_min_match = book.settings.min_match;

    if json {
        let entries: Vec<RuleEntry> = book
            .rules
            .iter()
            .map(|r| entry(r, default_min_match))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {} rule(s), aggregation {}, min match {:.0}%",
        "Rule book:".cyan().bold(),
        book.rules.len(),
        book.settings.aggregation,
        default_min_match * 100.0
    );

    for rule in &book.rules {
        let entry = entry(rule, default_min_match);
        println!(
            "\n{} {} {}",
            entry.genre.bold(),
            format!("[{}]", entry.id).dimmed(),
            format!(
                "confidence {:.2}, fires at {:.0}%",
                entry.confidence,
                entry.min_match * 100.0
            )
            .dimmed()
        );
        for clause in &entry.clauses {
            let weight = if clause.weight == 1.0 {
                String::new()
            } else {
                format!(" x{}", clause.weight)
            };
            println!(
                "  - {}{}  {}",
                clause.label,
                weight,
                clause.condition.dimmed()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use genrewise_spec::{Clause, Condition};

    #[test]
    fn test_rules_builtin() {
        assert_eq!(run(None, false).unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(None, true).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_entry_uses_effective_min_match() {
        let rule = Rule::new("blues", "Blues", "{matched}")
            .with_min_match(0.75)
            .clause(
                Clause::new(Condition::TempoBetween { min: 60, max: 100 })
                    .with_label("slow tempo")
                    .with_weight(2.0),
            );
        let entry = entry(&rule, 0.5);
        assert_eq!(entry.min_match, 0.75);
        assert_eq!(entry.clauses.len(), 1);
        assert_eq!(entry.clauses[0].label, "slow tempo");
        assert_eq!(entry.clauses[0].weight, 2.0);

        let plain = Rule::new("plain", "Plain", "{matched}");
        assert_eq!(super::entry(&plain, 0.5).min_match, 0.5);
    }
}
