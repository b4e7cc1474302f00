//! Rule book loading tests: files on disk, fail-fast validation, widened vocabularies.

use genrewise_engine::{InferenceEngine, Request, Session};
use genrewise_spec::{
    Condition, ErrorCode, Rule, RuleBook, SpecError, Vocabulary, WarningCode, YearRange,
};
use genrewise_tests::fixtures::{calypso_rule, RuleBookFixture};

#[test]
fn load_round_trips_through_disk() {
    let book = RuleBook::new(Vocabulary::default()).with_rule(calypso_rule());
    let fixture = RuleBookFixture::new(&book);

    let loaded = RuleBook::load(fixture.path()).unwrap();
    assert_eq!(loaded, book);
    assert!(InferenceEngine::new(loaded).is_ok());
}

#[test]
fn undeclared_vocabulary_is_fatal() {
    let fixture = RuleBookFixture::from_json(
        r#"{
            "format_version": 1,
            "vocabulary": {
                "tempo_buckets": [{"name": "mid", "label": "Mid", "bpm": 110}],
                "vocal_styles": ["clean"],
                "instruments": ["piano"]
            },
            "rules": [{
                "id": "kazoo_core",
                "genre": "Kazoo Core",
                "conditions": [
                    {"type": "instruments_any", "instruments": ["kazoo"]},
                    {"type": "vocals_in", "styles": ["yodel"]}
                ],
                "reason": "{matched}"
            }]
        }"#,
    );

    match RuleBook::load(fixture.path()) {
        Err(SpecError::ValidationFailed(errors)) => {
            let codes: Vec<ErrorCode> = errors.iter().map(|e| e.code).collect();
            assert_eq!(
                codes,
                vec![ErrorCode::UndeclaredInstrument, ErrorCode::UndeclaredVocalStyle]
            );
        }
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn unknown_condition_type_is_a_parse_error() {
    let fixture = RuleBookFixture::from_json(
        r#"{
            "format_version": 1,
            "vocabulary": {"tempo_buckets": [{"name": "mid", "label": "Mid", "bpm": 110}]},
            "rules": [{
                "id": "moody",
                "genre": "Moody",
                "conditions": [{"type": "mood_is", "mood": "sad"}],
                "reason": "{matched}"
            }]
        }"#,
    );
    assert!(matches!(
        RuleBook::load(fixture.path()),
        Err(SpecError::JsonParse(_))
    ));
}

#[test]
fn warnings_do_not_block_loading() {
    let book = RuleBook::new(Vocabulary::default())
        .with_rule(calypso_rule())
        .with_rule(Rule::new("fallback", "Unclassified", "{matched}").with_confidence(0.05));
    let warnings = book.ensure_valid().unwrap();

    let codes: Vec<WarningCode> = warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, vec![WarningCode::UnconditionalRule]);

    // An unconditional rule fires even on an empty request
    let session = Session::from_rulebook(book).unwrap();
    let answer = session.submit(&Request::new()).unwrap();
    assert_eq!(answer.best().unwrap().genre, "Unclassified");
    assert_eq!(answer.best().unwrap().confidence, 0.05);
}

#[test]
fn widened_year_range_accepts_historical_years() {
    let mut vocab = Vocabulary::default();
    vocab.years = YearRange::new(1700, 2025);
    let book = RuleBook::new(vocab).with_rule(
        Rule::new("classical_era", "Classical", "{matched} suggest {genre}")
            .clause(Condition::YearBetween {
                min: 1730,
                max: 1820,
            })
            .clause(Condition::VocalsIn {
                styles: vec!["instrumental".to_string()],
            }),
    );
    let session = Session::from_rulebook(book).unwrap();

    let answer = session
        .submit(&Request::new().with("year", 1790).with("vocals", "instrumental"))
        .unwrap();
    assert!(answer.dropped().is_empty());
    assert_eq!(answer.best().unwrap().confidence, 1.0);

    let builtin = Session::builtin().unwrap();
    let answer = builtin.submit(&Request::new().with("year", 1790)).unwrap();
    assert_eq!(answer.facts().year(), None);
    assert_eq!(answer.dropped().len(), 1);
}

#[test]
fn builtin_presets_resolve_to_declared_buckets() {
    let book = RuleBook::builtin().unwrap();
    for preset in &book.presets {
        let bucket = preset.tempo_bucket(&book.vocabulary).unwrap();
        assert!(
            book.vocabulary.tempo_bucket_for_bpm(bucket.bpm).is_some(),
            "preset {} maps to undeclared bucket",
            preset.name
        );
    }
}
