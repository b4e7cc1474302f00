//! Presets command implementation

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::config::load_rulebook;

/// JSON record for one preset.
#[derive(Debug, Serialize)]
struct PresetEntry<'a> {
    #[serde(flatten)]
    preset: &'a genrewise_spec::Preset,
    /// Tempo bucket the preset's target BPM maps to.
    #[serde(skip_serializing_if = "Option::is_none")]
    tempo_bucket: Option<&'a str>,
}

/// Run the presets command
pub fn run(rules: Option<&Path>, json: bool) -> Result<ExitCode> {
    let book = load_rulebook(rules)?;
    let vocab = &book.vocabulary;

    if json {
        let entries: Vec<PresetEntry> = book
            .presets
            .iter()
            .map(|preset| PresetEntry {
                preset,
                tempo_bucket: preset.tempo_bucket(vocab).map(|b| b.name.as_str()),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(ExitCode::SUCCESS);
    }

    if book.presets.is_empty() {
        println!("{}", "No presets defined.".dimmed());
        return Ok(ExitCode::SUCCESS);
    }

    for preset in &book.presets {
        println!("{}", preset.name.bold());
        if let Some(ref description) = preset.description {
            println!("  {}", description.dimmed());
        }
        if let Some(year) = preset.year {
            println!("  {:<12} {}", "year", year);
        }
        if let Some(bpm) = preset.bpm {
            let bucket = preset
                .tempo_bucket(vocab)
                .map(|b| format!(" -> {} ({} BPM)", b.label, b.bpm))
                .unwrap_or_default();
            println!("  {:<12} {}{}", "tempo", bpm, bucket.dimmed());
        }
        if let Some(ref vocals) = preset.vocals {
            println!("  {:<12} {}", "vocals", vocals);
        }
        if let Some(ref instruments) = preset.instruments {
            println!("  {:<12} {}", "instruments", instruments.join(", "));
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_builtin() {
        assert_eq!(run(None, false).unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(None, true).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_preset_entry_includes_bucket() {
        let book = genrewise_spec::RuleBook::builtin().unwrap();
        let preset = book.preset("Island Party").unwrap();
        let entry = PresetEntry {
            preset,
            tempo_bucket: preset.tempo_bucket(&book.vocabulary).map(|b| b.name.as_str()),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["name"], "Island Party");
        assert_eq!(value["bpm"], 128);
        assert_eq!(value["tempo_bucket"], "fast");
    }
}
