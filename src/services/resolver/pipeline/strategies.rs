//! The individual matching strategies.
//!
//! Each strategy names the slug predicates it wants pushed down to the
//! repository, then picks at most one winner from what comes back. A strategy
//! that does not apply to a query (too short, single word) simply reports
//! `NoMatch`.

use log::debug;

use crate::services::config::models::{MatchThresholds, PreferenceProfile};
use crate::services::resolver::analysis::fuzzy::rank_fuzzy;
use crate::services::resolver::analysis::preference::tag_score;
use crate::services::resolver::analysis::selection::{
    admit_candidates, is_clear_winner, rank_by_tags, MatchCandidate,
};
use crate::services::resolver::core::normalizer::SlugInfo;
use crate::services::resolver::core::tag_filter::TagFilter;
use crate::services::resolver::models::types::{
    MatchResult, MediaRecord, Strategy, StrategyOutcome,
};
use crate::services::resolver::state::repository::SlugPredicate;

const EXACT_CONFIDENCE: f64 = 1.0;
const SECONDARY_CONFIDENCE: f64 = 0.95;
const MAIN_TITLE_CONFIDENCE: f64 = 0.90;
const SIGNATURE_CONFIDENCE: f64 = 0.95;

/// Everything a strategy needs to judge candidates for one query.
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    pub system_id: &'a str,
    pub query: &'a SlugInfo,
    pub filter: &'a TagFilter,
    pub prefs: &'a PreferenceProfile,
    pub thresholds: &'a MatchThresholds,
}

impl Strategy {
    /// Repository predicates for this strategy. Empty when the strategy cannot
    /// apply to the query.
    pub fn predicates(&self, query: &SlugInfo, thresholds: &MatchThresholds) -> Vec<SlugPredicate> {
        match self {
            Strategy::ExactMatch => vec![SlugPredicate::Exact(query.slug.clone())],
            Strategy::SecondaryTitleExact => {
                let mut predicates = Vec::new();
                if query.slug_length >= thresholds.min_secondary_slug_len {
                    predicates.push(SlugPredicate::Secondary(query.slug.clone()));
                }
                if has_usable_subtitle(query, thresholds) {
                    predicates.push(SlugPredicate::Exact(query.secondary_slug.clone()));
                }
                predicates
            }
            Strategy::MainTitleOnly => vec![SlugPredicate::Prefix(query.main_title_slug.clone())],
            Strategy::TokenSignature if query.tokens.len() >= thresholds.min_signature_tokens => {
                vec![SlugPredicate::All]
            }
            Strategy::TokenSignature => Vec::new(),
            Strategy::Fuzzy => vec![SlugPredicate::All],
            Strategy::ProgressiveTrim => Vec::new(),
        }
    }

    /// Pick a winner among `records`, which the repository already narrowed
    /// with this strategy's predicates.
    pub fn attempt(&self, ctx: &MatchContext<'_>, records: &[MediaRecord]) -> StrategyOutcome {
        match self {
            Strategy::ExactMatch => attempt_exact(ctx, records),
            Strategy::SecondaryTitleExact => attempt_secondary(ctx, records),
            Strategy::MainTitleOnly => attempt_main_title(ctx, records),
            Strategy::TokenSignature => attempt_token_signature(ctx, records),
            Strategy::Fuzzy => attempt_fuzzy(ctx, records),
            Strategy::ProgressiveTrim => StrategyOutcome::NoMatch,
        }
    }
}

/// Records that may outrank an exact match that was not decisive: those whose
/// subtitle is the query.
pub fn exact_challenge_predicate(
    query: &SlugInfo,
    thresholds: &MatchThresholds,
) -> Option<SlugPredicate> {
    (query.slug_length >= thresholds.min_secondary_slug_len)
        .then(|| SlugPredicate::Secondary(query.slug.clone()))
}

/// Settle a non-decisive exact match against subtitle matches.
///
/// The best subtitle match replaces the exact winner only when its tag score
/// is strictly higher.
pub fn challenge_exact(
    ctx: &MatchContext<'_>,
    exact_records: &[MediaRecord],
    challengers: &[MediaRecord],
    exact: MatchResult,
) -> MatchResult {
    let Some(exact_score) = exact_records
        .iter()
        .find(|r| r.path == exact.path)
        .map(|r| tag_score(r, ctx.prefs))
    else {
        return exact;
    };

    let matching: Vec<MediaRecord> = challengers
        .iter()
        .filter(|r| r.has_secondary() && r.secondary_slug == ctx.query.slug)
        .cloned()
        .collect();
    let ranked = rank_by_tags(&matching, ctx.filter, ctx.prefs);
    match ranked.first() {
        Some(best) if best.tag_score > exact_score => {
            debug!(
                "[Resolver] Exact match {} ({:.3}) outranked by subtitle match {} ({:.3})",
                exact.name, exact_score, best.record.name, best.tag_score
            );
            MatchResult::new(best.record, Strategy::SecondaryTitleExact, SECONDARY_CONFIDENCE)
        }
        _ => exact,
    }
}

fn attempt_exact(ctx: &MatchContext<'_>, records: &[MediaRecord]) -> StrategyOutcome {
    let matching: Vec<MediaRecord> = records
        .iter()
        .filter(|r| r.slug == ctx.query.slug)
        .cloned()
        .collect();
    let ranked = rank_by_tags(&matching, ctx.filter, ctx.prefs);
    let Some(best) = ranked.first() else {
        return StrategyOutcome::NoMatch;
    };

    let result = MatchResult::new(best.record, Strategy::ExactMatch, EXACT_CONFIDENCE);
    if is_clear_winner(&ranked, ctx.thresholds.early_exit_tag_score) {
        debug!(
            "[Resolver] Exact match early exit: {} (tag score {:.3})",
            best.record.name, best.tag_score
        );
        StrategyOutcome::Decisive(result)
    } else {
        StrategyOutcome::Matched(result)
    }
}

/// A record whose subtitle is the query wins first. Failing that, a record
/// named exactly like the query's own subtitle.
fn attempt_secondary(ctx: &MatchContext<'_>, records: &[MediaRecord]) -> StrategyOutcome {
    let query = ctx.query;
    if query.slug_length >= ctx.thresholds.min_secondary_slug_len {
        let matching: Vec<MediaRecord> = records
            .iter()
            .filter(|r| r.has_secondary() && r.secondary_slug == query.slug)
            .cloned()
            .collect();
        let outcome = pick_best(ctx, &matching, Strategy::SecondaryTitleExact, SECONDARY_CONFIDENCE);
        if outcome != StrategyOutcome::NoMatch {
            return outcome;
        }
    }

    if !has_usable_subtitle(query, ctx.thresholds) {
        return StrategyOutcome::NoMatch;
    }
    let matching: Vec<MediaRecord> = records
        .iter()
        .filter(|r| r.slug == query.secondary_slug)
        .cloned()
        .collect();
    pick_best(ctx, &matching, Strategy::SecondaryTitleExact, SECONDARY_CONFIDENCE)
}

/// Two shapes are accepted: the query is a bare main title and the record is
/// that main title plus a subtitle, or the query carries a subtitle the
/// library lacks and the record is exactly the query's main title.
fn attempt_main_title(ctx: &MatchContext<'_>, records: &[MediaRecord]) -> StrategyOutcome {
    let query = ctx.query;
    let matching: Vec<MediaRecord> = records
        .iter()
        .filter(|r| {
            let names_main_only =
                !query.has_secondary() && r.has_secondary() && r.main_title_slug == query.slug;
            let drops_query_subtitle =
                query.has_secondary() && r.slug == query.main_title_slug;
            names_main_only || drops_query_subtitle
        })
        .cloned()
        .collect();
    pick_best(ctx, &matching, Strategy::MainTitleOnly, MAIN_TITLE_CONFIDENCE)
}

fn attempt_token_signature(ctx: &MatchContext<'_>, records: &[MediaRecord]) -> StrategyOutcome {
    if ctx.query.tokens.len() < ctx.thresholds.min_signature_tokens {
        return StrategyOutcome::NoMatch;
    }
    let signature = ctx.query.token_signature();
    let matching: Vec<MediaRecord> = records
        .iter()
        .filter(|r| r.word_count >= ctx.thresholds.min_signature_tokens)
        .filter(|r| r.token_signature == signature)
        .cloned()
        .collect();
    pick_best(ctx, &matching, Strategy::TokenSignature, SIGNATURE_CONFIDENCE)
}

fn attempt_fuzzy(ctx: &MatchContext<'_>, records: &[MediaRecord]) -> StrategyOutcome {
    let candidates: Vec<MatchCandidate<'_>> = admit_candidates(records, ctx.filter, ctx.prefs);
    let hits = rank_fuzzy(&ctx.query.slug, candidates, ctx.thresholds);
    let Some(best) = hits.first() else {
        return StrategyOutcome::NoMatch;
    };

    debug!(
        "[Fuzzy] Best '{}' for '{}' at {:.3} ({} over floor)",
        best.candidate.record.slug,
        ctx.query.slug,
        best.similarity,
        hits.len()
    );

    let mut result = MatchResult::new(best.candidate.record, Strategy::Fuzzy, best.similarity);
    result.low_confidence = best.similarity < ctx.thresholds.low_confidence_below;
    StrategyOutcome::Matched(result)
}

fn has_usable_subtitle(query: &SlugInfo, thresholds: &MatchThresholds) -> bool {
    query.has_secondary() && query.secondary_slug.len() >= thresholds.min_secondary_slug_len
}

fn pick_best(
    ctx: &MatchContext<'_>,
    matching: &[MediaRecord],
    strategy: Strategy,
    confidence: f64,
) -> StrategyOutcome {
    let ranked = rank_by_tags(matching, ctx.filter, ctx.prefs);
    match ranked.first() {
        Some(best) => StrategyOutcome::Matched(MatchResult::new(best.record, strategy, confidence)),
        None => StrategyOutcome::NoMatch,
    }
}

#[cfg(test)]
#[path = "tests/strategies_tests.rs"]
mod tests;
