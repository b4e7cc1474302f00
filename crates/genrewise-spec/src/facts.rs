//! The fact model: a sparse record of what is known about one song.
//!
//! A [`FactSet`] can only be built through a [`FactSetBuilder`], which checks
//! every value against a [`Vocabulary`]. Values outside their declared domain
//! are dropped (and reported as [`DroppedFact`]s); asserting two different
//! values for the same attribute is a [`FactError::Conflict`].

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FactError;
use crate::vocab::{normalize_label, Vocabulary};

/// A recognized song attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    /// Release year.
    Year,
    /// Representative tempo of the chosen tempo bucket.
    Bpm,
    /// Vocal style label.
    Vocals,
    /// Set of instrument labels.
    Instruments,
}

impl Attribute {
    /// All attributes in canonical order.
    pub const ALL: [Attribute; 4] = [
        Attribute::Year,
        Attribute::Bpm,
        Attribute::Vocals,
        Attribute::Instruments,
    ];

    /// Returns the attribute name as used in requests and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Year => "year",
            Attribute::Bpm => "bpm",
            Attribute::Vocals => "vocals",
            Attribute::Instruments => "instruments",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = FactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).as_str() {
            "year" => Ok(Attribute::Year),
            "bpm" | "tempo" => Ok(Attribute::Bpm),
            "vocals" | "vocal" => Ok(Attribute::Vocals),
            "instruments" | "instrument" => Ok(Attribute::Instruments),
            _ => Err(FactError::UnknownAttribute(s.to_string())),
        }
    }
}

/// A raw attribute value as it arrives from a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    /// A whole number (year, bpm).
    Integer(i64),
    /// A text value (vocal style, tempo label, numeric text, comma list).
    Text(String),
    /// A list of labels (instruments).
    List(Vec<String>),
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Integer(i) => write!(f, "{}", i),
            FactValue::Text(t) => write!(f, "{}", t),
            FactValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<i64> for FactValue {
    fn from(value: i64) -> Self {
        FactValue::Integer(value)
    }
}

impl From<i32> for FactValue {
    fn from(value: i32) -> Self {
        FactValue::Integer(value.into())
    }
}

impl From<u32> for FactValue {
    fn from(value: u32) -> Self {
        FactValue::Integer(value.into())
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Text(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::Text(value)
    }
}

impl From<Vec<String>> for FactValue {
    fn from(value: Vec<String>) -> Self {
        FactValue::List(value)
    }
}

impl From<Vec<&str>> for FactValue {
    fn from(value: Vec<&str>) -> Self {
        FactValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// A value that was dropped because it lies outside its declared domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedFact {
    /// The attribute the value was meant for.
    pub attribute: Attribute,
    /// The offending value, as text.
    pub value: String,
    /// Why it was dropped.
    pub reason: String,
}

/// The known attributes of one song for a single classification request.
///
/// Absent attributes are `None`. An empty instrument set is a legal value,
/// distinct from an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct FactSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bpm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vocals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instruments: Option<BTreeSet<String>>,
}

impl FactSet {
    /// Creates a fact set with no attributes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts building a fact set checked against `vocab`.
    pub fn builder(vocab: &Vocabulary) -> FactSetBuilder<'_> {
        FactSetBuilder::new(vocab)
    }

    /// Release year, if known.
    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Representative tempo, if known.
    pub fn bpm(&self) -> Option<u32> {
        self.bpm
    }

    /// Vocal style, if specified.
    pub fn vocals(&self) -> Option<&str> {
        self.vocals.as_deref()
    }

    /// Instrument set, if specified (possibly empty).
    pub fn instruments(&self) -> Option<&BTreeSet<String>> {
        self.instruments.as_ref()
    }

    /// Returns true if the instrument set is present and contains `instrument`.
    pub fn has_instrument(&self, instrument: &str) -> bool {
        self.instruments
            .as_ref()
            .is_some_and(|set| set.contains(instrument))
    }

    /// Returns true if `attribute` holds a value.
    pub fn is_set(&self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::Year => self.year.is_some(),
            Attribute::Bpm => self.bpm.is_some(),
            Attribute::Vocals => self.vocals.is_some(),
            Attribute::Instruments => self.instruments.is_some(),
        }
    }

    /// Number of attributes that hold a value.
    pub fn len(&self) -> usize {
        Attribute::ALL.iter().filter(|a| self.is_set(**a)).count()
    }

    /// Returns true if no attribute holds a value.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders the value held by `attribute`, if any.
    pub fn display_value(&self, attribute: Attribute) -> Option<String> {
        match attribute {
            Attribute::Year => self.year.map(|y| y.to_string()),
            Attribute::Bpm => self.bpm.map(|b| b.to_string()),
            Attribute::Vocals => self.vocals.clone(),
            Attribute::Instruments => self.instruments.as_ref().map(display_set),
        }
    }
}

fn display_set(set: &BTreeSet<String>) -> String {
    let items: Vec<&str> = set.iter().map(String::as_str).collect();
    format!("[{}]", items.join(", "))
}

/// A value that passed domain checks, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolved {
    Year(i32),
    Bpm(u32),
    Vocals(String),
    Instruments(BTreeSet<String>),
}

impl Resolved {
    fn attribute(&self) -> Attribute {
        match self {
            Resolved::Year(_) => Attribute::Year,
            Resolved::Bpm(_) => Attribute::Bpm,
            Resolved::Vocals(_) => Attribute::Vocals,
            Resolved::Instruments(_) => Attribute::Instruments,
        }
    }

    fn display(&self) -> String {
        match self {
            Resolved::Year(y) => y.to_string(),
            Resolved::Bpm(b) => b.to_string(),
            Resolved::Vocals(v) => v.clone(),
            Resolved::Instruments(set) => display_set(set),
        }
    }
}

/// Assembles a [`FactSet`] from (attribute, value) pairs.
///
/// # Example
/// ```
/// use genrewise_spec::{Attribute, FactSet, Vocabulary};
///
/// let vocab = Vocabulary::default();
/// let mut builder = FactSet::builder(&vocab);
/// builder
///     .set(Attribute::Year, 1969)?
///     .set(Attribute::Bpm, "fast")?
///     .set(Attribute::Instruments, vec!["bongos", "bass"])?;
/// let facts = builder.build();
///
/// assert_eq!(facts.bpm(), Some(135));
/// assert!(facts.has_instrument("bongos"));
/// # Ok::<(), genrewise_spec::FactError>(())
/// ```
#[derive(Debug)]
pub struct FactSetBuilder<'v> {
    vocab: &'v Vocabulary,
    facts: FactSet,
    dropped: Vec<DroppedFact>,
}

impl<'v> FactSetBuilder<'v> {
    /// Creates a builder that checks values against `vocab`.
    pub fn new(vocab: &'v Vocabulary) -> Self {
        Self {
            vocab,
            facts: FactSet::default(),
            dropped: Vec::new(),
        }
    }

    /// Asserts a value for `attribute`.
    ///
    /// Out-of-domain values are dropped. Re-asserting an identical value is a
    /// no-op; asserting a different one is an error.
    pub fn set(
        &mut self,
        attribute: Attribute,
        value: impl Into<FactValue>,
    ) -> Result<&mut Self, FactError> {
        if let Some(resolved) = self.resolve(attribute, value.into()) {
            self.assign(resolved, true)?;
        }
        Ok(self)
    }

    /// Asserts a value for the attribute called `name`.
    pub fn set_named(
        &mut self,
        name: &str,
        value: impl Into<FactValue>,
    ) -> Result<&mut Self, FactError> {
        let attribute: Attribute = name.parse()?;
        self.set(attribute, value)
    }

    /// Asserts a value only if `attribute` is still absent.
    pub fn fill(&mut self, attribute: Attribute, value: impl Into<FactValue>) -> &mut Self {
        if self.facts.is_set(attribute) {
            return self;
        }
        if let Some(resolved) = self.resolve(attribute, value.into()) {
            // Cannot conflict: the attribute was absent.
            let _ = self.assign(resolved, false);
        }
        self
    }

    /// Values dropped so far.
    pub fn dropped(&self) -> &[DroppedFact] {
        &self.dropped
    }

    /// Finishes the fact set.
    pub fn build(self) -> FactSet {
        self.facts
    }

    /// Finishes the fact set, also returning the dropped values.
    pub fn finish(self) -> (FactSet, Vec<DroppedFact>) {
        (self.facts, self.dropped)
    }

    fn drop_value(&mut self, attribute: Attribute, value: impl Into<String>, reason: impl Into<String>) {
        let dropped = DroppedFact {
            attribute,
            value: value.into(),
            reason: reason.into(),
        };
        tracing::warn!(
            attribute = %dropped.attribute,
            value = %dropped.value,
            "dropping fact: {}",
            dropped.reason
        );
        self.dropped.push(dropped);
    }

    fn resolve(&mut self, attribute: Attribute, value: FactValue) -> Option<Resolved> {
        match attribute {
            Attribute::Year => self.resolve_year(value),
            Attribute::Bpm => self.resolve_bpm(value),
            Attribute::Vocals => self.resolve_vocals(value),
            Attribute::Instruments => self.resolve_instruments(value),
        }
    }

    fn resolve_year(&mut self, value: FactValue) -> Option<Resolved> {
        let raw = match &value {
            FactValue::Integer(i) => Some(*i),
            FactValue::Text(t) => t.trim().parse::<i64>().ok(),
            FactValue::List(_) => None,
        };
        let Some(year) = raw.and_then(|y| i32::try_from(y).ok()) else {
            self.drop_value(Attribute::Year, value.to_string(), "not a year");
            return None;
        };
        let years = self.vocab.years;
        if !years.contains(year) {
            self.drop_value(
                Attribute::Year,
                year.to_string(),
                format!("outside {}-{}", years.min, years.max),
            );
            return None;
        }
        Some(Resolved::Year(year))
    }

    fn resolve_bpm(&mut self, value: FactValue) -> Option<Resolved> {
        let bucket = match &value {
            FactValue::Integer(i) => u32::try_from(*i)
                .ok()
                .and_then(|bpm| self.vocab.tempo_bucket_for_bpm(bpm)),
            FactValue::Text(t) => match t.trim().parse::<u32>() {
                Ok(bpm) => self.vocab.tempo_bucket_for_bpm(bpm),
                Err(_) => self.vocab.tempo_bucket(t),
            },
            FactValue::List(_) => None,
        };
        match bucket {
            Some(bucket) => Some(Resolved::Bpm(bucket.bpm)),
            None => {
                self.drop_value(Attribute::Bpm, value.to_string(), "not a declared tempo bucket");
                None
            }
        }
    }

    fn resolve_vocals(&mut self, value: FactValue) -> Option<Resolved> {
        let FactValue::Text(text) = &value else {
            self.drop_value(Attribute::Vocals, value.to_string(), "expected a single vocal style");
            return None;
        };
        let style = normalize_label(text);
        if style.is_empty() {
            return None;
        }
        if !self.vocab.is_vocal_style(&style) {
            self.drop_value(Attribute::Vocals, style, "not a declared vocal style");
            return None;
        }
        Some(Resolved::Vocals(style))
    }

    fn resolve_instruments(&mut self, value: FactValue) -> Option<Resolved> {
        let labels: Vec<String> = match value {
            FactValue::List(items) => items,
            FactValue::Text(text) => text.split(',').map(str::to_string).collect(),
            FactValue::Integer(i) => {
                self.drop_value(Attribute::Instruments, i.to_string(), "expected instrument labels");
                return None;
            }
        };

        let mut set = BTreeSet::new();
        for raw in labels {
            let label = normalize_label(&raw);
            if label.is_empty() {
                continue;
            }
            if self.vocab.is_instrument(&label) {
                set.insert(label);
            } else {
                self.drop_value(Attribute::Instruments, label, "not a declared instrument");
            }
        }
        Some(Resolved::Instruments(set))
    }

    fn assign(&mut self, resolved: Resolved, check_conflict: bool) -> Result<(), FactError> {
        let attribute = resolved.attribute();
        if check_conflict {
            if let Some(existing) = self.facts.display_value(attribute) {
                let incoming = resolved.display();
                if existing != incoming {
                    return Err(FactError::Conflict {
                        attribute,
                        existing,
                        incoming,
                    });
                }
                return Ok(());
            }
        }

        match resolved {
            Resolved::Year(y) => self.facts.year = Some(y),
            Resolved::Bpm(b) => self.facts.bpm = Some(b),
            Resolved::Vocals(v) => self.facts.vocals = Some(v),
            Resolved::Instruments(set) => self.facts.instruments = Some(set),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vocab() -> Vocabulary {
        Vocabulary::default()
    }

    #[test]
    fn test_attribute_parse() {
        assert_eq!("year".parse::<Attribute>().unwrap(), Attribute::Year);
        assert_eq!("tempo".parse::<Attribute>().unwrap(), Attribute::Bpm);
        assert_eq!("BPM".parse::<Attribute>().unwrap(), Attribute::Bpm);
        assert_eq!("Instruments".parse::<Attribute>().unwrap(), Attribute::Instruments);
        assert_eq!(
            "mood".parse::<Attribute>(),
            Err(FactError::UnknownAttribute("mood".to_string()))
        );
    }

    #[test]
    fn test_empty_fact_set() {
        let facts = FactSet::empty();
        assert!(facts.is_empty());
        assert_eq!(facts.len(), 0);
        assert_eq!(serde_json::to_string(&facts).unwrap(), "{}");
    }

    #[test]
    fn test_builder_full_fact_set() {
        let vocab = vocab();
        let mut builder = FactSet::builder(&vocab);
        builder
            .set(Attribute::Year, 1969)
            .unwrap()
            .set(Attribute::Bpm, "Fast (125-150 BPM)")
            .unwrap()
            .set(Attribute::Vocals, "Upbeat")
            .unwrap()
            .set(Attribute::Instruments, vec!["acoustic guitar", "bongos", "bass"])
            .unwrap();
        let facts = builder.build();

        assert_eq!(facts.year(), Some(1969));
        assert_eq!(facts.bpm(), Some(135));
        assert_eq!(facts.vocals(), Some("upbeat"));
        assert!(facts.has_instrument("acoustic_guitar"));
        assert!(facts.has_instrument("bongos"));
        assert_eq!(facts.len(), 4);
    }

    #[test]
    fn test_bpm_accepts_bucket_value_and_numeric_text() {
        let vocab = vocab();
        let mut builder = FactSet::builder(&vocab);
        builder.set(Attribute::Bpm, 85u32).unwrap();
        assert_eq!(builder.build().bpm(), Some(85));

        let mut builder = FactSet::builder(&vocab);
        builder.set(Attribute::Bpm, "160").unwrap();
        assert_eq!(builder.build().bpm(), Some(160));
    }

    #[test]
    fn test_bpm_accepts_spaced_and_hyphenated_bucket_names() {
        let vocab = vocab();
        for key in ["very fast", "Very-Fast"] {
            let mut builder = FactSet::builder(&vocab);
            builder.set(Attribute::Bpm, key).unwrap();
            let (facts, dropped) = builder.finish();
            assert_eq!(facts.bpm(), Some(160), "key {:?}", key);
            assert!(dropped.is_empty());
        }
    }

    #[test]
    fn test_raw_bpm_outside_buckets_is_dropped() {
        let vocab = vocab();
        let mut builder = FactSet::builder(&vocab);
        builder.set(Attribute::Bpm, 128u32).unwrap();
        let (facts, dropped) = builder.finish();

        assert_eq!(facts.bpm(), None);
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].attribute, Attribute::Bpm);
    }

    #[test]
    fn test_year_outside_range_is_dropped() {
        let vocab = vocab();
        let mut builder = FactSet::builder(&vocab);
        builder.set(Attribute::Year, 1790).unwrap();
        builder.set(Attribute::Vocals, "yodel").unwrap();
        let (facts, dropped) = builder.finish();

        assert!(facts.is_empty());
        assert_eq!(dropped.len(), 2);
        assert_eq!(dropped[0].reason, "outside 1950-2025");
        assert_eq!(dropped[1].value, "yodel");
    }

    #[test]
    fn test_unknown_instruments_dropped_individually() {
        let vocab = vocab();
        let mut builder = FactSet::builder(&vocab);
        builder
            .set(Attribute::Instruments, "bongos, kazoo, bass")
            .unwrap();
        let (facts, dropped) = builder.finish();

        let expected: BTreeSet<String> =
            ["bass", "bongos"].iter().map(|s| s.to_string()).collect();
        assert_eq!(facts.instruments(), Some(&expected));
        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].value, "kazoo");
    }

    #[test]
    fn test_empty_instrument_set_is_distinct_from_absent() {
        let vocab = vocab();
        let mut builder = FactSet::builder(&vocab);
        builder.set(Attribute::Instruments, Vec::<String>::new()).unwrap();
        let facts = builder.build();

        assert!(facts.is_set(Attribute::Instruments));
        assert_eq!(facts.instruments().map(|s| s.len()), Some(0));
        assert!(!facts.is_empty());
        assert_ne!(facts, FactSet::empty());
    }

    #[test]
    fn test_blank_vocals_means_not_specified() {
        let vocab = vocab();
        let mut builder = FactSet::builder(&vocab);
        builder.set(Attribute::Vocals, "  ").unwrap();
        let (facts, dropped) = builder.finish();
        assert!(facts.vocals().is_none());
        assert!(dropped.is_empty());
    }

    #[test]
    fn test_conflicting_values_error() {
        let vocab = vocab();
        let mut builder = FactSet::builder(&vocab);
        builder.set(Attribute::Year, 1969).unwrap();
        let err = builder.set(Attribute::Year, "1970").unwrap_err();

        assert_eq!(
            err,
            FactError::Conflict {
                attribute: Attribute::Year,
                existing: "1969".to_string(),
                incoming: "1970".to_string(),
            }
        );
    }

    #[test]
    fn test_reasserting_same_value_is_noop() {
        let vocab = vocab();
        let mut builder = FactSet::builder(&vocab);
        builder.set(Attribute::Bpm, "fast").unwrap();
        builder.set(Attribute::Bpm, 135u32).unwrap();
        builder
            .set(Attribute::Instruments, vec!["bass", "bongos"])
            .unwrap();
        builder
            .set(Attribute::Instruments, vec!["bongos", "bass"])
            .unwrap();
        assert_eq!(builder.build().bpm(), Some(135));
    }

    #[test]
    fn test_fill_only_sets_absent_attributes() {
        let vocab = vocab();
        let mut builder = FactSet::builder(&vocab);
        builder.set(Attribute::Year, 2001).unwrap();
        builder.fill(Attribute::Year, 1969).fill(Attribute::Vocals, "soulful");
        let facts = builder.build();

        assert_eq!(facts.year(), Some(2001));
        assert_eq!(facts.vocals(), Some("soulful"));
    }

    #[test]
    fn test_set_named_rejects_unknown_attribute() {
        let vocab = vocab();
        let mut builder = FactSet::builder(&vocab);
        assert!(matches!(
            builder.set_named("yeer", 1969),
            Err(FactError::UnknownAttribute(_))
        ));
    }

    #[test]
    fn test_fact_set_serializes_sparse() {
        let vocab = vocab();
        let mut builder = FactSet::builder(&vocab);
        builder
            .set(Attribute::Year, 1984)
            .unwrap()
            .set(Attribute::Instruments, vec!["synthesizer"])
            .unwrap();
        let json = serde_json::to_value(builder.build()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"year": 1984, "instruments": ["synthesizer"]})
        );
    }

    #[test]
    fn test_fact_value_untagged_deserialize() {
        let values: Vec<FactValue> =
            serde_json::from_str(r#"[1969, "fast", ["bongos", "bass"]]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FactValue::Integer(1969),
                FactValue::Text("fast".to_string()),
                FactValue::List(vec!["bongos".to_string(), "bass".to_string()]),
            ]
        );
    }
}
