//! Validate command implementation
//!
//! Parses a rule book and reports every coded validation error and warning.

use anyhow::Result;
use colored::Colorize;
use genrewise_spec::ValidationResult;
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{error_codes, JsonError, JsonWarning, ValidateOutput};
use crate::config::RuleBookSource;

/// Run the validate command
///
/// # Arguments
/// * `rules` - Rule book path (built-in rule book if `None`)
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(rules: Option<&Path>, json_output: bool) -> Result<ExitCode> {
    let source = RuleBookSource::resolve(rules);
    if json_output {
        run_json(&source)
    } else {
        run_human(&source)
    }
}

/// Run validate with human-readable (colored) output
fn run_human(source: &RuleBookSource) -> Result<ExitCode> {
    println!("{} {}", "Validating:".cyan().bold(), source);

    let book = source.parse()?;
    let result = book.validate();
    print_validation_results(&result);

    if result.is_ok() {
        println!(
            "\n{} Rule book is valid ({} rules, {} presets)",
            "SUCCESS".green().bold(),
            book.rules.len(),
            book.presets.len()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} Rule book has {} error(s)",
            "FAILED".red().bold(),
            result.errors.len()
        );
        Ok(ExitCode::from(1))
    }
}

/// Run validate with machine-readable JSON output
fn run_json(source: &RuleBookSource) -> Result<ExitCode> {
    let output = match source.parse() {
        Ok(book) => {
            let result = book.validate();
            ValidateOutput {
                success: result.is_ok(),
                source: source.to_string(),
                errors: result.errors.iter().map(JsonError::from).collect(),
                warnings: result.warnings.iter().map(JsonWarning::from).collect(),
                rules: Some(book.rules.len()),
                presets: Some(book.presets.len()),
            }
        }
        Err(e) => ValidateOutput {
            success: false,
            source: source.to_string(),
            errors: vec![JsonError::new(error_codes::RULEBOOK_LOAD, format!("{:#}", e))],
            warnings: Vec::new(),
            rules: None,
            presets: None,
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    if output.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn print_validation_results(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in &result.errors {
            let path_info = error
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "x".red(),
                error.code.to_string().red(),
                path_info.dimmed(),
                error.message
            );
        }
    }

    if !result.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in &result.warnings {
            let path_info = warning
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warning.code.to_string().yellow(),
                path_info.dimmed(),
                warning.message
            );
        }
    }
}
