//! Picking one record out of several equally matching ones.

use std::cmp::Ordering;

use super::preference::{is_admitted, tag_score};
use crate::services::config::models::PreferenceProfile;
use crate::services::resolver::core::tag_filter::TagFilter;
use crate::services::resolver::models::types::MediaRecord;

/// A record that passed the tag filter, with its preference score.
#[derive(Debug, Clone)]
pub struct MatchCandidate<'a> {
    pub record: &'a MediaRecord,
    pub tag_score: f64,
    /// Position in repository discovery order.
    pub order: usize,
}

/// Drop records the filter rejects and score the rest.
pub fn admit_candidates<'a>(
    records: &'a [MediaRecord],
    filter: &TagFilter,
    prefs: &PreferenceProfile,
) -> Vec<MatchCandidate<'a>> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| is_admitted(record, filter))
        .map(|(order, record)| MatchCandidate {
            record,
            tag_score: tag_score(record, prefs),
            order,
        })
        .collect()
}

/// Highest tag score first, discovery order breaking ties.
pub fn sort_candidates_deterministic(candidates: &mut [MatchCandidate<'_>]) {
    candidates.sort_by(|a, b| {
        b.tag_score
            .partial_cmp(&a.tag_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.order.cmp(&b.order))
    });
}

/// Admit and rank in one step.
pub fn rank_by_tags<'a>(
    records: &'a [MediaRecord],
    filter: &TagFilter,
    prefs: &PreferenceProfile,
) -> Vec<MatchCandidate<'a>> {
    let mut candidates = admit_candidates(records, filter, prefs);
    sort_candidates_deterministic(&mut candidates);
    candidates
}

/// True when the leader is strictly ahead of the runner-up and at or above
/// `threshold`.
pub fn is_clear_winner(ranked: &[MatchCandidate<'_>], threshold: f64) -> bool {
    match ranked {
        [] => false,
        [only] => only.tag_score >= threshold,
        [first, second, ..] => first.tag_score >= threshold && first.tag_score > second.tag_score,
    }
}

#[cfg(test)]
#[path = "tests/selection_tests.rs"]
mod tests;
