//! Tests for rule types, evaluation, and reason templates.

use pretty_assertions::assert_eq;

use crate::facts::{Attribute, FactSet};
use crate::vocab::Vocabulary;

use super::{round_confidence, Clause, Condition, ReasonTemplate, Rule, TemplateError};

fn calypso_facts() -> FactSet {
    let vocab = Vocabulary::default();
    let mut builder = FactSet::builder(&vocab);
    builder
        .set(Attribute::Year, 1969)
        .unwrap()
        .set(Attribute::Bpm, "fast")
        .unwrap()
        .set(Attribute::Vocals, "upbeat")
        .unwrap()
        .set(Attribute::Instruments, vec!["acoustic_guitar", "bongos", "bass"])
        .unwrap();
    builder.build()
}

fn calypso_rule() -> Rule {
    Rule::new("calypso_pop", "Calypso Pop", "{matched} indicate {genre}")
        .clause(Clause::new(Condition::TempoBetween { min: 125, max: 200 }).with_label("high tempo"))
        .clause(
            Clause::new(Condition::VocalsIn {
                styles: vec!["upbeat".to_string()],
            })
            .with_label("upbeat vocals"),
        )
        .clause(Condition::InstrumentsAny {
            instruments: vec!["bongos".to_string()],
        })
}

#[test]
fn test_condition_display() {
    assert_eq!(
        Condition::YearBetween { min: 1960, max: 1979 }.to_string(),
        "year_between(1960, 1979)"
    );
    assert_eq!(
        Condition::InstrumentsAny {
            instruments: vec!["bongos".to_string(), "cajon".to_string()]
        }
        .to_string(),
        "instruments_any(bongos, cajon)"
    );
    assert_eq!(Condition::NoInstruments.to_string(), "no_instruments");
}

#[test]
fn test_condition_default_labels() {
    assert_eq!(
        Condition::InstrumentsAll {
            instruments: vec!["acoustic_guitar".to_string(), "bongos".to_string()]
        }
        .default_label(),
        "acoustic guitar and bongos"
    );
    assert_eq!(
        Condition::VocalsIn {
            styles: vec!["raspy".to_string(), "energetic".to_string(), "clean".to_string()]
        }
        .default_label(),
        "raspy, energetic or clean vocals"
    );
    assert_eq!(
        Condition::InstrumentsExclude {
            instruments: vec!["drums".to_string()]
        }
        .default_label(),
        "no drums"
    );
}

#[test]
fn test_clause_serialization_is_flat() {
    let json = r#"{"type": "tempo_between", "min": 125, "max": 200, "label": "high tempo"}"#;
    let clause: Clause = serde_json::from_str(json).unwrap();
    assert_eq!(clause.condition, Condition::TempoBetween { min: 125, max: 200 });
    assert_eq!(clause.weight, 1.0);
    assert_eq!(clause.label(), "high tempo");

    let unit: Clause = serde_json::from_str(r#"{"type": "no_instruments", "weight": 2.0}"#).unwrap();
    assert_eq!(unit.condition, Condition::NoInstruments);
    assert_eq!(unit.weight, 2.0);

    let value = serde_json::to_value(&clause).unwrap();
    assert_eq!(value["type"], "tempo_between");
    assert_eq!(value["min"], 125);
}

#[test]
fn test_rule_defaults_from_json() {
    let json = r#"{"id": "ambient", "genre": "Ambient", "reason": "{genre}"}"#;
    let rule: Rule = serde_json::from_str(json).unwrap();
    assert!(rule.conditions.is_empty());
    assert_eq!(rule.confidence, 1.0);
    assert_eq!(rule.min_match, None);
}

#[test]
fn test_absent_attributes_fail_conditions() {
    let facts = FactSet::empty();
    let conditions = [
        Condition::YearBetween { min: 1950, max: 2025 },
        Condition::TempoBetween { min: 0, max: 500 },
        Condition::VocalsIn {
            styles: vec!["upbeat".to_string()],
        },
        Condition::InstrumentsExclude {
            instruments: vec!["drums".to_string()],
        },
        Condition::NoInstruments,
    ];
    for condition in &conditions {
        assert!(!condition.evaluate(&facts), "{} should fail", condition);
    }
}

#[test]
fn test_empty_instrument_set_matches_only_no_instrument_conditions() {
    let vocab = Vocabulary::default();
    let mut builder = FactSet::builder(&vocab);
    builder
        .set(Attribute::Instruments, Vec::<String>::new())
        .unwrap();
    let facts = builder.build();

    assert!(Condition::NoInstruments.evaluate(&facts));
    assert!(Condition::InstrumentsExclude {
        instruments: vec!["drums".to_string()]
    }
    .evaluate(&facts));
    assert!(!Condition::InstrumentsAny {
        instruments: vec!["drums".to_string()]
    }
    .evaluate(&facts));
}

#[test]
fn test_instrument_conditions() {
    let facts = calypso_facts();
    assert!(Condition::InstrumentsAll {
        instruments: vec!["bongos".to_string(), "bass".to_string()]
    }
    .evaluate(&facts));
    assert!(!Condition::InstrumentsAll {
        instruments: vec!["bongos".to_string(), "cajon".to_string()]
    }
    .evaluate(&facts));
    assert!(!Condition::InstrumentsExclude {
        instruments: vec!["bass".to_string()]
    }
    .evaluate(&facts));
    assert!(!Condition::NoInstruments.evaluate(&facts));
}

#[test]
fn test_full_match_scores_rule_confidence() {
    let evaluation = calypso_rule().evaluate(&calypso_facts());
    assert_eq!(evaluation.score, 1.0);
    assert_eq!(evaluation.matched, vec!["high tempo", "upbeat vocals", "bongos"]);
    assert!(evaluation.missed.is_empty());
    assert!(evaluation.fires(0.5));
}

#[test]
fn test_partial_match_is_proportional() {
    let vocab = Vocabulary::default();
    let mut builder = FactSet::builder(&vocab);
    builder
        .set(Attribute::Bpm, "fast")
        .unwrap()
        .set(Attribute::Vocals, "soulful")
        .unwrap()
        .set(Attribute::Instruments, vec!["bongos"])
        .unwrap();
    let evaluation = calypso_rule().evaluate(&builder.build());

    assert_eq!(evaluation.score, round_confidence(2.0 / 3.0));
    assert_eq!(evaluation.score, 0.6667);
    assert_eq!(evaluation.missed, vec!["upbeat vocals"]);
    assert!(evaluation.fires(0.5));
    assert!(!evaluation.fires(0.75));
}

#[test]
fn test_weights_and_confidence_ceiling() {
    let rule = Rule::new("r", "Genre", "{matched}")
        .with_confidence(0.8)
        .clause(Clause::new(Condition::TempoBetween { min: 125, max: 200 }).with_weight(3.0))
        .clause(Clause::new(Condition::NoInstruments).with_weight(1.0));
    let evaluation = rule.evaluate(&calypso_facts());

    assert_eq!(evaluation.fraction, 0.75);
    assert_eq!(evaluation.score, 0.6);
}

#[test]
fn test_nothing_matched_never_fires() {
    let evaluation = calypso_rule().evaluate(&FactSet::empty());
    assert_eq!(evaluation.score, 0.0);
    assert!(!evaluation.fires(0.0));
}

#[test]
fn test_unconditional_rule_always_fires() {
    let rule = Rule::new("any", "Unclassified", "{genre}").with_confidence(0.1);
    let evaluation = rule.evaluate(&FactSet::empty());
    assert!(evaluation.fires(1.0));
    assert_eq!(evaluation.score, 0.1);
}

#[test]
fn test_effective_min_match() {
    assert_eq!(calypso_rule().effective_min_match(0.5), 0.5);
    assert_eq!(calypso_rule().with_min_match(1.0).effective_min_match(0.5), 1.0);
}

#[test]
fn test_reason_template_render() {
    let rule = calypso_rule();
    let evaluation = rule.evaluate(&calypso_facts());
    let template = ReasonTemplate::parse(&rule.reason).unwrap();

    assert_eq!(
        template.render(&rule.genre, &evaluation),
        "high tempo + upbeat vocals + bongos indicate Calypso Pop"
    );
}

#[test]
fn test_reason_template_all_placeholders() {
    let rule = calypso_rule();
    let evaluation = rule.evaluate(&FactSet::empty());
    let template =
        ReasonTemplate::parse("{genre} at {confidence}: matched {matched}, missed {missed}").unwrap();

    assert_eq!(
        template.render(&rule.genre, &evaluation),
        "Calypso Pop at 0.0%: matched nothing, missed high tempo + upbeat vocals + bongos"
    );
}

#[test]
fn test_reason_template_unknown_placeholder() {
    assert_eq!(
        ReasonTemplate::parse("{matched} suggest {style}"),
        Err(TemplateError::UnknownPlaceholder("style".to_string()))
    );
}

#[test]
fn test_reason_template_cites_matches() {
    assert!(ReasonTemplate::parse("{matched}").unwrap().cites_matches());
    assert!(!ReasonTemplate::parse("Sounds like {genre}").unwrap().cites_matches());
    assert!(!ReasonTemplate::parse("plain text").unwrap().cites_matches());
}
