//! Rule book resolution for CLI commands.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use genrewise_spec::RuleBook;

/// Environment variable naming a rule book file.
pub const RULES_ENV: &str = "GENREWISE_RULES";

/// Where a rule book comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleBookSource {
    /// A JSON file on disk.
    File(PathBuf),
    /// The rule book compiled into the binary.
    Builtin,
}

impl RuleBookSource {
    /// Resolves the source from the `--rules` value.
    ///
    /// Clap fills `--rules` from [`RULES_ENV`] when the flag is absent, so a
    /// `None` here means neither was given. An empty value also selects the
    /// built-in rule book.
    pub fn resolve(rules: Option<&Path>) -> Self {
        match rules {
            Some(path) if !path.as_os_str().is_empty() => RuleBookSource::File(path.to_path_buf()),
            _ => RuleBookSource::Builtin,
        }
    }

    /// Loads and validates the rule book.
    pub fn load(&self) -> Result<RuleBook> {
        match self {
            RuleBookSource::File(path) => RuleBook::load(path)
                .with_context(|| format!("Failed to load rule book: {}", path.display())),
            RuleBookSource::Builtin => {
                RuleBook::builtin().context("Built-in rule book is invalid")
            }
        }
    }

    /// Reads and parses the rule book without validating it.
    pub fn parse(&self) -> Result<RuleBook> {
        match self {
            RuleBookSource::File(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read rule book: {}", path.display()))?;
                RuleBook::parse(&json)
                    .with_context(|| format!("Failed to parse rule book: {}", path.display()))
            }
            RuleBookSource::Builtin => {
                RuleBook::builtin().context("Built-in rule book is invalid")
            }
        }
    }
}

impl fmt::Display for RuleBookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleBookSource::File(path) => write!(f, "{}", path.display()),
            RuleBookSource::Builtin => write!(f, "built-in"),
        }
    }
}

/// Loads the rule book selected by `--rules` (or the environment).
pub fn load_rulebook(rules: Option<&Path>) -> Result<RuleBook> {
    RuleBookSource::resolve(rules).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve() {
        assert_eq!(RuleBookSource::resolve(None), RuleBookSource::Builtin);
        assert_eq!(
            RuleBookSource::resolve(Some(Path::new(""))),
            RuleBookSource::Builtin
        );
        assert_eq!(
            RuleBookSource::resolve(Some(Path::new("rules.json"))),
            RuleBookSource::File(PathBuf::from("rules.json"))
        );
    }

    #[test]
    fn test_load_builtin() {
        let book = load_rulebook(None).unwrap();
        assert!(book.rule("calypso_pop").is_some());
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = load_rulebook(Some(Path::new("/nonexistent/rules.json"))).unwrap_err();
        assert!(err
            .to_string()
            .contains("Failed to load rule book: /nonexistent/rules.json"));
    }

    #[test]
    fn test_parse_skips_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"format_version": 2, "vocabulary": {"tempo_buckets": []}}"#)
            .unwrap();
        let source = RuleBookSource::resolve(Some(file.path()));

        assert!(source.load().is_err());
        let book = source.parse().unwrap();
        assert_eq!(book.format_version, 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(RuleBookSource::Builtin.to_string(), "built-in");
    }
}
