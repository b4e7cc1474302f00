//! Attribute vocabularies declared by a rule book.
//!
//! Vocabularies are configuration data: the release-year range, the labelled
//! tempo buckets, and the vocal-style and instrument label sets. Every value
//! a fact set or a rule may mention must come from here.

use serde::{Deserialize, Serialize};

/// Inclusive release-year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// Earliest accepted year.
    pub min: i32,
    /// Latest accepted year.
    pub max: i32,
}

impl YearRange {
    /// Creates a new year range.
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Returns true if `year` falls inside the range.
    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    /// Returns true if the two inclusive ranges share at least one year.
    pub fn overlaps(&self, min: i32, max: i32) -> bool {
        min <= self.max && max >= self.min
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::new(1950, 2025)
    }
}

/// A labelled representative tempo standing in for a tempo range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempoBucket {
    /// Short machine name (e.g., "fast").
    pub name: String,
    /// Display label (e.g., "Fast (125-150 BPM)").
    pub label: String,
    /// Representative BPM value asserted as the `bpm` fact.
    pub bpm: u32,
}

impl TempoBucket {
    /// Creates a new tempo bucket.
    pub fn new(name: impl Into<String>, label: impl Into<String>, bpm: u32) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            bpm,
        }
    }

    /// Matches a normalized key against the name, the full label, or the
    /// label without its parenthesized range ("Mid-Tempo (100-125 BPM)").
    fn matches_key(&self, key: &str) -> bool {
        let key = normalize_label(key);
        if key.is_empty() {
            return false;
        }
        let short_label = self.label.split('(').next().unwrap_or_default();
        key == normalize_label(&self.name)
            || key == normalize_label(&self.label)
            || key == normalize_label(short_label)
    }
}

/// The full set of attribute vocabularies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Accepted release years.
    #[serde(default)]
    pub years: YearRange,
    /// Ordered tempo buckets; order decides nearest-bucket ties.
    pub tempo_buckets: Vec<TempoBucket>,
    /// Declared vocal-style labels.
    #[serde(default)]
    pub vocal_styles: Vec<String>,
    /// Declared instrument labels.
    #[serde(default)]
    pub instruments: Vec<String>,
}

impl Vocabulary {
    /// Returns true if `style` is a declared vocal style.
    pub fn is_vocal_style(&self, style: &str) -> bool {
        self.vocal_styles.iter().any(|s| s == style)
    }

    /// Returns true if `instrument` is a declared instrument.
    pub fn is_instrument(&self, instrument: &str) -> bool {
        self.instruments.iter().any(|i| i == instrument)
    }

    /// Looks up a tempo bucket by name or label after [`normalize_label`].
    pub fn tempo_bucket(&self, key: &str) -> Option<&TempoBucket> {
        self.tempo_buckets.iter().find(|b| b.matches_key(key))
    }

    /// Looks up the tempo bucket whose representative value is exactly `bpm`.
    pub fn tempo_bucket_for_bpm(&self, bpm: u32) -> Option<&TempoBucket> {
        self.tempo_buckets.iter().find(|b| b.bpm == bpm)
    }

    /// Returns the bucket whose representative BPM is closest to `bpm`.
    ///
    /// Distance is the absolute difference of BPM values; on a tie the
    /// first-listed bucket wins. Returns `None` only if no buckets exist.
    ///
    /// # Example
    /// ```
    /// use genrewise_spec::Vocabulary;
    ///
    /// let vocab = Vocabulary::default();
    /// assert_eq!(vocab.nearest_tempo_bucket(128).unwrap().name, "fast");
    /// assert_eq!(vocab.nearest_tempo_bucket(97).unwrap().name, "slow");
    /// ```
    pub fn nearest_tempo_bucket(&self, bpm: u32) -> Option<&TempoBucket> {
        let mut best: Option<(&TempoBucket, u32)> = None;
        for bucket in &self.tempo_buckets {
            let distance = bucket.bpm.abs_diff(bpm);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((bucket, distance)),
            }
        }
        best.map(|(bucket, _)| bucket)
    }

    /// Returns true if any tempo bucket's representative value lies in `[min, max]`.
    pub fn has_bucket_between(&self, min: u32, max: u32) -> bool {
        self.tempo_buckets
            .iter()
            .any(|b| (min..=max).contains(&b.bpm))
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            years: YearRange::default(),
            tempo_buckets: vec![
                TempoBucket::new("very_slow", "Very Slow (Under 75 BPM)", 70),
                TempoBucket::new("slow", "Slow (75-100 BPM)", 85),
                TempoBucket::new("mid", "Mid-Tempo (100-125 BPM)", 110),
                TempoBucket::new("fast", "Fast (125-150 BPM)", 135),
                TempoBucket::new("very_fast", "Very Fast (Over 150 BPM)", 160),
            ],
            vocal_styles: [
                "clean",
                "classical_melodic",
                "energetic",
                "falsetto",
                "instrumental",
                "melodic",
                "narrative",
                "raspy",
                "robotic_vocal",
                "soulful",
                "upbeat",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            instruments: [
                "acoustic_guitar",
                "bass",
                "bongos",
                "cajon",
                "cello",
                "double_bass",
                "drums",
                "drum_machine",
                "electric_guitar",
                "flute",
                "harmonica",
                "organ",
                "piano",
                "sampler",
                "saxophone",
                "serpina",
                "sitar",
                "strings",
                "synthesizer",
                "tabla",
                "trombone",
                "trumpet",
                "violin",
                "viola",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Normalizes a user-supplied label to vocabulary form.
///
/// Trims, lower-cases, and folds spaces and hyphens to underscores, so
/// "Acoustic Guitar" becomes "acoustic_guitar".
pub fn normalize_label(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}
