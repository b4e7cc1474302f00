//! Aggregation and ranking of recommendations.

use std::collections::HashMap;

use genrewise_spec::{round_confidence, Aggregation, Recommendation, Settings};
use serde::Serialize;

/// Separator between reasons of merged recommendations.
const REASON_SEPARATOR: &str = "; ";

/// Recommendations ordered by confidence, highest first.
///
/// Equal confidences keep rule book emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ranking {
    items: Vec<Recommendation>,
}

impl Ranking {
    /// The highest-confidence recommendation, if any.
    pub fn best(&self) -> Option<&Recommendation> {
        self.items.first()
    }

    /// All recommendations in ranked order.
    pub fn all(&self) -> &[Recommendation] {
        &self.items
    }

    /// Number of ranked recommendations.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing was ranked.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates in ranked order.
    pub fn iter(&self) -> std::slice::Iter<'_, Recommendation> {
        self.items.iter()
    }

    /// Consumes the ranking, returning the ordered recommendations.
    pub fn into_vec(self) -> Vec<Recommendation> {
        self.items
    }
}

impl IntoIterator for Ranking {
    type Item = Recommendation;
    type IntoIter = std::vec::IntoIter<Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Ranking {
    type Item = &'a Recommendation;
    type IntoIter = std::slice::Iter<'a, Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Aggregates, sorts, and truncates recommendations given in emission order.
pub fn rank(recommendations: Vec<Recommendation>, settings: &Settings) -> Ranking {
    let mut items = aggregate(recommendations, settings.aggregation);
    // sort_by is stable: ties keep emission order
    items.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    if let Some(max) = settings.max_results {
        items.truncate(max);
    }
    Ranking { items }
}

/// Merges recommendations that share a genre.
///
/// The output keeps emission order; a merged entry sits where its genre first
/// appeared (for [`Aggregation::BestPerGenre`], where the kept entry was).
pub fn aggregate(
    recommendations: Vec<Recommendation>,
    aggregation: Aggregation,
) -> Vec<Recommendation> {
    match aggregation {
        Aggregation::KeepAll => recommendations,
        Aggregation::BestPerGenre => best_per_genre(recommendations),
        Aggregation::Combine => combine(recommendations),
    }
}

fn best_per_genre(recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut best: HashMap<&str, usize> = HashMap::new();
    for (index, rec) in recommendations.iter().enumerate() {
        best.entry(rec.genre.as_str())
            .and_modify(|kept| {
                if rec.confidence > recommendations[*kept].confidence {
                    *kept = index;
                }
            })
            .or_insert(index);
    }

    let mut keep = vec![false; recommendations.len()];
    for index in best.into_values() {
        keep[index] = true;
    }

    recommendations
        .into_iter()
        .zip(keep)
        .filter_map(|(rec, kept)| kept.then_some(rec))
        .collect()
}

fn combine(recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    let mut merged: Vec<Recommendation> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for rec in recommendations {
        match positions.get(&rec.genre) {
            Some(&position) => {
                let target = &mut merged[position];
                // noisy-OR: 1 - (1 - a)(1 - b)
                target.confidence =
                    round_confidence(1.0 - (1.0 - target.confidence) * (1.0 - rec.confidence));
                target.reason.push_str(REASON_SEPARATOR);
                target.reason.push_str(&rec.reason);
            }
            None => {
                positions.insert(rec.genre.clone(), merged.len());
                merged.push(rec);
            }
        }
    }

    merged
}
