//! Vocab command implementation

use anyhow::{bail, Result};
use colored::Colorize;
use genrewise_spec::TempoBucket;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::config::load_rulebook;

/// JSON output for `vocab --bpm`.
#[derive(Debug, Serialize)]
struct NearestOutput<'a> {
    bpm: u32,
    nearest: &'a TempoBucket,
    distance: u32,
}

/// Run the vocab command
///
/// With `bpm`, prints only the tempo bucket nearest to it.
pub fn run(rules: Option<&Path>, bpm: Option<u32>, json: bool) -> Result<ExitCode> {
    let book = load_rulebook(rules)?;
    let vocab = &book.vocabulary;

    if let Some(bpm) = bpm {
        let Some(nearest) = vocab.nearest_tempo_bucket(bpm) else {
            bail!("rule book declares no tempo buckets");
        };
        if json {
            let output = NearestOutput {
                bpm,
                nearest,
                distance: nearest.bpm.abs_diff(bpm),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!(
                "{} BPM -> {} ({}, {} BPM)",
                bpm,
                nearest.name.bold(),
                nearest.label,
                nearest.bpm
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(vocab)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {}-{}",
        "Years:".cyan().bold(),
        vocab.years.min,
        vocab.years.max
    );

    println!("\n{}", "Tempo buckets:".cyan().bold());
    for bucket in &vocab.tempo_buckets {
        println!("  {:<12} {:>4} BPM  {}", bucket.name, bucket.bpm, bucket.label.dimmed());
    }

    println!("\n{}", "Vocal styles:".cyan().bold());
    println!("  {}", vocab.vocal_styles.join(", "));

    println!("\n{}", "Instruments:".cyan().bold());
    println!("  {}", vocab.instruments.join(", "));

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocab_builtin() {
        assert_eq!(run(None, None, false).unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(None, None, true).unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(None, Some(128), true).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_vocab_no_buckets_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(
            &path,
            r#"{"format_version": 1, "vocabulary": {"tempo_buckets": []}}"#,
        )
        .unwrap();
        // An empty bucket list fails validation before the lookup
        assert!(run(Some(&path), Some(100), false).is_err());
    }
}
