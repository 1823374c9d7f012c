//! Approximate slug matching for typos and near-miss titles.

use std::cmp::Ordering;

use rayon::prelude::*;

use super::selection::MatchCandidate;
use crate::services::config::models::MatchThresholds;

/// Above this many candidates similarity scoring runs on the rayon pool.
const PARALLEL_THRESHOLD: usize = 256;

/// Blend of Jaro-Winkler (rewards shared prefixes) and normalized
/// Damerau-Levenshtein (counts transpositions as one edit), in `[0, 1]`.
pub fn similarity(query: &str, candidate: &str, jaro_weight: f64) -> f64 {
    let jaro_weight = jaro_weight.clamp(0.0, 1.0);
    let jw = strsim::jaro_winkler(query, candidate);
    let dl = strsim::normalized_damerau_levenshtein(query, candidate);
    (jaro_weight * jw + (1.0 - jaro_weight) * dl).clamp(0.0, 1.0)
}

/// Allowed slug length difference for a query of `query_len` characters.
pub fn length_window(query_len: usize, thresholds: &MatchThresholds) -> usize {
    let divisor = thresholds.fuzzy_window_divisor.max(1);
    thresholds.fuzzy_min_window.max(query_len / divisor)
}

#[derive(Debug, Clone)]
pub struct FuzzyHit<'a> {
    pub candidate: MatchCandidate<'a>,
    pub similarity: f64,
}

/// Score every candidate within the length window and return those at or
/// above the confidence floor, best first.
///
/// Ordering: similarity, then tag score, then discovery order.
pub fn rank_fuzzy<'a>(
    query_slug: &str,
    candidates: Vec<MatchCandidate<'a>>,
    thresholds: &MatchThresholds,
) -> Vec<FuzzyHit<'a>> {
    let window = length_window(query_slug.len(), thresholds);
    let in_window: Vec<MatchCandidate<'a>> = candidates
        .into_iter()
        .filter(|c| c.record.slug_length.abs_diff(query_slug.len()) <= window)
        .collect();

    let score = |candidate: &MatchCandidate<'a>| -> Option<FuzzyHit<'a>> {
        let sim = similarity(query_slug, &candidate.record.slug, thresholds.fuzzy_jaro_weight);
        if sim < thresholds.min_confidence {
            return None;
        }
        Some(FuzzyHit {
            candidate: candidate.clone(),
            similarity: sim,
        })
    };

    let mut hits: Vec<FuzzyHit<'a>> = if in_window.len() > PARALLEL_THRESHOLD {
        in_window.par_iter().filter_map(score).collect()
    } else {
        in_window.iter().filter_map(score).collect()
    };

    hits.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.candidate
                    .tag_score
                    .partial_cmp(&a.candidate.tag_score)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.candidate.order.cmp(&b.candidate.order))
    });
    hits
}

#[cfg(test)]
#[path = "tests/fuzzy_tests.rs"]
mod tests;
