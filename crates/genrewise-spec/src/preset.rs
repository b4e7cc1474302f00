//! Named example attribute bundles that pre-fill a fact set.

use serde::{Deserialize, Serialize};

use crate::facts::{Attribute, FactSetBuilder};
use crate::vocab::{TempoBucket, Vocabulary};

/// A named example song description.
///
/// `bpm` is a target tempo, not a bucket value: applying the preset picks the
/// nearest tempo bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Preset name (e.g., "Island Party").
    pub name: String,
    /// Optional one-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Release year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Target tempo in BPM.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bpm: Option<u32>,
    /// Vocal style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vocals: Option<String>,
    /// Instrument labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruments: Option<Vec<String>>,
}

impl Preset {
    /// Returns true if `name` matches this preset, ignoring ASCII case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    /// The tempo bucket this preset's target tempo maps to.
    pub fn tempo_bucket<'v>(&self, vocab: &'v Vocabulary) -> Option<&'v TempoBucket> {
        self.bpm.and_then(|bpm| vocab.nearest_tempo_bucket(bpm))
    }

    /// Pre-fills every attribute the builder has not set yet.
    pub fn apply(&self, builder: &mut FactSetBuilder<'_>, vocab: &Vocabulary) {
        if let Some(year) = self.year {
            builder.fill(Attribute::Year, year);
        }
        if let Some(bucket) = self.tempo_bucket(vocab) {
            builder.fill(Attribute::Bpm, bucket.bpm);
        }
        if let Some(ref vocals) = self.vocals {
            builder.fill(Attribute::Vocals, vocals.as_str());
        }
        if let Some(ref instruments) = self.instruments {
            builder.fill(Attribute::Instruments, instruments.clone());
        }
    }

    /// Creates an empty preset with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            year: None,
            bpm: None,
            vocals: None,
            instruments: None,
        }
    }

    /// Builder method to set the release year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Builder method to set the target tempo.
    pub fn with_bpm(mut self, bpm: u32) -> Self {
        self.bpm = Some(bpm);
        self
    }

    /// Builder method to set the vocal style.
    pub fn with_vocals(mut self, vocals: impl Into<String>) -> Self {
        self.vocals = Some(vocals.into());
        self
    }

    /// Builder method to set the instruments.
    pub fn with_instruments(mut self, instruments: &[&str]) -> Self {
        self.instruments = Some(instruments.iter().map(|s| s.to_string()).collect());
        self
    }
}
