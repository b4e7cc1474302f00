//! CLI argument definitions for the Genrewise command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use genrewise_cli::config::RULES_ENV;

/// Genrewise - Rule-based music genre classification
#[derive(Parser)]
#[command(name = "genrewise")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Path to a rule book JSON file (default: built-in rule book)
    #[arg(long, global = true, env = RULES_ENV)]
    pub rules: Option<PathBuf>,

    /// Log engine diagnostics to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Classify a song description and print ranked genre recommendations
    Classify {
        /// Start from a named preset; explicit attributes take precedence
        #[arg(short, long)]
        preset: Option<String>,

        /// Release year
        #[arg(short, long, allow_negative_numbers = true)]
        year: Option<i64>,

        /// Tempo bucket name or label (e.g., "fast")
        #[arg(short, long, conflicts_with = "bpm")]
        tempo: Option<String>,

        /// Tempo bucket representative BPM (e.g., 135)
        #[arg(long)]
        bpm: Option<u32>,

        /// Vocal style (e.g., "upbeat")
        #[arg(long)]
        vocals: Option<String>,

        /// Instrument label (repeatable, or comma-separated)
        #[arg(short, long = "instrument", value_delimiter = ',')]
        instruments: Vec<String>,

        /// Assert an empty instrument set
        #[arg(long, conflicts_with = "instruments")]
        no_instruments: bool,

        /// Raw attribute assertion as key=value (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        set: Vec<(String, String)>,

        /// Show only the best match
        #[arg(long)]
        best: bool,

        /// Show how every rule scored, fired or not
        #[arg(long)]
        explain: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,

        /// Also write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the rule book's presets
    Presets {
        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the rule book's genre rules
    Rules {
        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show attribute vocabularies
    Vocab {
        /// Show the tempo bucket nearest to this BPM
        #[arg(long)]
        bpm: Option<u32>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Validate a rule book and report coded errors and warnings
    Validate {
        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

/// Parses a `key=value` pair.
pub(crate) fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
