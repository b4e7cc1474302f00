//! Genrewise CLI - Command-line interface for rule-based genre classification
//!
//! This binary classifies song descriptions against a rule book and provides
//! commands for inspecting and validating rule books.

use clap::Parser;
use std::process::ExitCode;

mod cli_args;

use cli_args::{Cli, Commands};
use genrewise_cli::commands;
use genrewise_cli::commands::classify::ClassifyArgs;
use genrewise_cli::logging;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let rules = cli.rules.as_deref();

    let result = match cli.command {
        Commands::Classify {
            preset,
            year,
            tempo,
            bpm,
            vocals,
            instruments,
            no_instruments,
            set,
            best,
            explain,
            json,
            output,
        } => commands::classify::run(
            rules,
            &ClassifyArgs {
                preset,
                year,
                tempo,
                bpm,
                vocals,
                instruments,
                no_instruments,
                set,
                best,
                explain,
                json,
                output,
            },
        ),
        Commands::Presets { json } => commands::presets::run(rules, json),
        Commands::Rules { json } => commands::rules::run(rules, json),
        Commands::Vocab { bpm, json } => commands::vocab::run(rules, bpm, json),
        Commands::Validate { json } => commands::validate::run(rules, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cli_args::parse_key_value;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parses_classify() {
        let cli = Cli::try_parse_from([
            "genrewise",
            "classify",
            "--year",
            "1969",
            "--tempo",
            "fast",
            "--vocals",
            "upbeat",
            "-i",
            "acoustic_guitar,bongos",
            "--instrument",
            "bass",
        ])
        .unwrap();
        match cli.command {
            Commands::Classify {
                year,
                tempo,
                vocals,
                instruments,
                json,
                ..
            } => {
                assert_eq!(year, Some(1969));
                assert_eq!(tempo.as_deref(), Some("fast"));
                assert_eq!(vocals.as_deref(), Some("upbeat"));
                assert_eq!(instruments, vec!["acoustic_guitar", "bongos", "bass"]);
                assert!(!json);
            }
            _ => panic!("expected classify command"),
        }
    }

    #[test]
    fn test_cli_parses_set_pairs() {
        let cli = Cli::try_parse_from([
            "genrewise",
            "classify",
            "--set",
            "year=1984",
            "--set",
            "instruments=synthesizer, drum_machine",
        ])
        .unwrap();
        match cli.command {
            Commands::Classify { set, .. } => {
                assert_eq!(
                    set,
                    vec![
                        ("year".to_string(), "1984".to_string()),
                        (
                            "instruments".to_string(),
                            "synthesizer, drum_machine".to_string()
                        ),
                    ]
                );
            }
            _ => panic!("expected classify command"),
        }
    }

    #[test]
    fn test_cli_rejects_tempo_with_bpm() {
        assert!(Cli::try_parse_from([
            "genrewise",
            "classify",
            "--tempo",
            "fast",
            "--bpm",
            "135"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_rejects_instruments_with_no_instruments() {
        assert!(Cli::try_parse_from([
            "genrewise",
            "classify",
            "-i",
            "bass",
            "--no-instruments"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_global_rules_flag() {
        let cli = Cli::try_parse_from(["genrewise", "validate", "--rules", "book.json", "--json"])
            .unwrap();
        assert_eq!(cli.rules, Some(PathBuf::from("book.json")));
        match cli.command {
            Commands::Validate { json } => assert!(json),
            _ => panic!("expected validate command"),
        }
    }

    #[test]
    fn test_cli_parses_vocab_bpm() {
        let cli = Cli::try_parse_from(["genrewise", "-v", "vocab", "--bpm", "128"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Vocab { bpm, json } => {
                assert_eq!(bpm, Some(128));
                assert!(!json);
            }
            _ => panic!("expected vocab command"),
        }
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("vocals = raspy").unwrap(),
            ("vocals".to_string(), "raspy".to_string())
        );
        assert!(parse_key_value("vocals").is_err());
        assert!(parse_key_value("=raspy").is_err());
    }
}
