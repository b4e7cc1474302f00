//! Classify command implementation
//!
//! Builds a request from command-line attributes, classifies it, and prints
//! the ranked recommendations.

use anyhow::{Context, Result};
use colored::Colorize;
use genrewise_engine::{Answer, Request, RuleTrace, Session};
use genrewise_spec::{Attribute, ClassificationReport, DroppedFact, FactSet, Vocabulary};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::load_rulebook;

/// Song attributes and output options for one classification.
#[derive(Debug, Clone, Default)]
pub struct ClassifyArgs {
    pub preset: Option<String>,
    pub year: Option<i64>,
    pub tempo: Option<String>,
    pub bpm: Option<u32>,
    pub vocals: Option<String>,
    pub instruments: Vec<String>,
    pub no_instruments: bool,
    /// Raw `key=value` assertions.
    pub set: Vec<(String, String)>,
    pub best: bool,
    pub explain: bool,
    pub json: bool,
    pub output: Option<PathBuf>,
}

impl ClassifyArgs {
    /// Builds the engine request these arguments describe.
    pub fn request(&self) -> Request {
        let mut request = Request::new();
        if let Some(year) = self.year {
            request.set("year", year);
        }
        if let Some(ref tempo) = self.tempo {
            request.set("bpm", tempo.as_str());
        }
        if let Some(bpm) = self.bpm {
            request.set("bpm", bpm);
        }
        if let Some(ref vocals) = self.vocals {
            request.set("vocals", vocals.as_str());
        }
        if self.no_instruments {
            request.set("instruments", Vec::<String>::new());
        } else if !self.instruments.is_empty() {
            request.set("instruments", self.instruments.clone());
        }
        for (key, value) in &self.set {
            request.set(key.as_str(), value.as_str());
        }
        match self.preset {
            Some(ref name) => request.with_preset(name.as_str()),
            None => request,
        }
    }
}

/// JSON output for the `classify` command.
#[derive(Debug, Serialize)]
struct ClassifyOutput<'a> {
    #[serde(flatten)]
    report: &'a ClassificationReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    dropped: Vec<DroppedFact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<RuleTrace>>,
}

/// Run the classify command
///
/// # Arguments
/// * `rules` - Rule book path (built-in rule book if `None`)
/// * `args` - Song attributes and output options
///
/// # Returns
/// Exit code: 0 on a match or no match, errors propagate
pub fn run(rules: Option<&Path>, args: &ClassifyArgs) -> Result<ExitCode> {
    let book = load_rulebook(rules)?;
    let session = Session::from_rulebook(book).context("Rule book rejected by engine")?;

    let answer = session
        .submit(&args.request())
        .context("Classification failed")?;

    let mut report = answer.report();
    if args.best {
        report.all_recommendations.truncate(1);
    }
    let trace = args
        .explain
        .then(|| session.engine().evaluate(answer.facts()));

    if let Some(ref path) = args.output {
        let json = report.to_json_pretty()?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
    }

    if args.json {
        let output = ClassifyOutput {
            report: &report,
            dropped: answer.dropped().to_vec(),
            trace,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    print_facts(answer.facts(), &session.rulebook().vocabulary);
    print_dropped(&answer);

    match report.best_match {
        Some(ref best) => {
            println!(
                "\n{} {} ({})",
                "Best match:".green().bold(),
                best.genre.bold(),
                best.confidence_percent()
            );
            println!("  {}", best.reason);

            if report.all_recommendations.len() > 1 {
                println!("\n{}", "All recommendations:".cyan().bold());
                for (rank, rec) in report.all_recommendations.iter().enumerate() {
                    println!(
                        "  {:>2}. {:<20} {:>6}  {}",
                        rank + 1,
                        rec.genre,
                        rec.confidence_percent(),
                        rec.reason.dimmed()
                    );
                }
            }
        }
        None => {
            println!(
                "\n{} No specific genre matched these attributes. Try adjusting them.",
                "warning:".yellow().bold()
            );
        }
    }

    if let Some(ref traces) = trace {
        print_trace(traces);
    }

    if let Some(ref path) = args.output {
        println!("\n{} {}", "Report written to:".dimmed(), path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn print_facts(facts: &FactSet, vocab: &Vocabulary) {
    println!("{}", "Attributes:".cyan().bold());
    if facts.is_empty() {
        println!("  {}", "(none)".dimmed());
        return;
    }
    for attribute in Attribute::ALL {
        let Some(value) = facts.display_value(attribute) else {
            continue;
        };
        let detail = match (attribute, facts.bpm()) {
            (Attribute::Bpm, Some(bpm)) => vocab
                .tempo_bucket_for_bpm(bpm)
                .map(|b| format!(" ({})", b.label))
                .unwrap_or_default(),
            _ => String::new(),
        };
        println!("  {:<12} {}{}", attribute.as_str(), value, detail.dimmed());
    }
}

fn print_dropped(answer: &Answer) {
    for dropped in answer.dropped() {
        println!(
            "  {} ignored {} '{}': {}",
            "!".yellow(),
            dropped.attribute,
            dropped.value,
            dropped.reason
        );
    }
}

fn print_trace(traces: &[RuleTrace]) {
    println!("\n{}", "Rule trace:".cyan().bold());
    for trace in traces {
        let marker = if trace.fired {
            "+".green()
        } else {
            "-".dimmed()
        };
        println!(
            "  {} {:<20} {:>6.1}% of weight (needs {:.0}%), score {:.4}",
            marker,
            trace.rule_id,
            trace.fraction * 100.0,
            trace.min_match * 100.0,
            trace.score
        );
        if !trace.matched.is_empty() {
            println!("      {} {}", "matched:".dimmed(), trace.matched.join(", "));
        }
        if !trace.missed.is_empty() {
            println!("      {} {}", "missed:".dimmed(), trace.missed.join(", "));
        }
    }
}
