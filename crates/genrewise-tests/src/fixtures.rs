//! Test fixtures: small rule books and fact sets.

use std::fs;
use std::path::{Path, PathBuf};

use genrewise_spec::{Attribute, Clause, Condition, FactSet, Rule, RuleBook, Vocabulary};
use tempfile::TempDir;

/// A rule book file in a temporary directory.
pub struct RuleBookFixture {
    pub root: TempDir,
    pub path: PathBuf,
}

impl RuleBookFixture {
    /// Writes `book` as pretty JSON.
    pub fn new(book: &RuleBook) -> Self {
        let json = book.to_json_pretty().expect("Failed to serialize rule book");
        Self::from_json(&json)
    }

    /// Writes raw JSON, valid or not.
    pub fn from_json(json: &str) -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let path = root.path().join("rules.json");
        fs::write(&path, json).expect("Failed to write rule book");
        Self { root, path }
    }

    /// Get the rule book path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The "Calypso Pop" rule: high tempo, upbeat vocals, and bongos.
pub fn calypso_rule() -> Rule {
    Rule::new("calypso_pop", "Calypso Pop", "{matched} indicate {genre}")
        .clause(Clause::new(Condition::TempoBetween { min: 125, max: 200 }).with_label("high tempo"))
        .clause(
            Clause::new(Condition::VocalsIn {
                styles: strings(&["upbeat"]),
            })
            .with_label("upbeat vocals"),
        )
        .clause(Condition::InstrumentsAny {
            instruments: strings(&["bongos"]),
        })
}

/// Two independent rules that fire at 0.8 and 0.5 on [`two_rule_facts`],
/// listed lowest-confidence first.
pub fn two_rule_book() -> RuleBook {
    RuleBook::new(Vocabulary::default())
        .with_rule(
            Rule::new("folk", "Folk", "{matched} suggest {genre}")
                .with_confidence(0.5)
                .clause(Condition::InstrumentsAny {
                    instruments: strings(&["acoustic_guitar"]),
                }),
        )
        .with_rule(
            Rule::new("retro_soul", "Retro Soul", "{matched} suggest {genre}")
                .with_confidence(0.8)
                .clause(Condition::YearBetween {
                    min: 1960,
                    max: 1979,
                })
                .clause(Condition::VocalsIn {
                    styles: strings(&["soulful"]),
                }),
        )
}

/// Facts that fully satisfy both rules of [`two_rule_book`].
pub fn two_rule_facts() -> FactSet {
    let vocab = Vocabulary::default();
    let mut builder = FactSet::builder(&vocab);
    builder
        .set(Attribute::Year, 1972)
        .and_then(|b| b.set(Attribute::Vocals, "soulful"))
        .and_then(|b| b.set(Attribute::Instruments, vec!["acoustic_guitar"]))
        .expect("fixture facts are consistent");
    builder.build()
}

/// The canonical calypso song description.
pub fn calypso_facts() -> FactSet {
    let vocab = Vocabulary::default();
    let mut builder = FactSet::builder(&vocab);
    builder
        .set(Attribute::Year, 1969)
        .and_then(|b| b.set(Attribute::Bpm, "Fast"))
        .and_then(|b| b.set(Attribute::Vocals, "upbeat"))
        .and_then(|b| b.set(Attribute::Instruments, vec!["acoustic_guitar", "bongos", "bass"]))
        .expect("fixture facts are consistent");
    builder.build()
}
