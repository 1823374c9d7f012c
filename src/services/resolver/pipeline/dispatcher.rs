//! Runs the strategy chain for one normalized query.
//!
//! Chain order is fixed: exact, secondary title, main title, token signature,
//! fuzzy. The first strategy to produce a match wins. An exact match below
//! the early-exit tag score may still lose to a better-tagged subtitle match.
//! Progressive trimming only runs once the whole chain came up empty on the
//! untrimmed query.

use std::collections::HashSet;

use log::debug;

use super::strategies::{challenge_exact, exact_challenge_predicate, MatchContext};
use crate::services::config::models::MatchThresholds;
use crate::services::resolver::core::normalizer::{normalize, strip_metadata, SlugInfo};
use crate::services::resolver::models::types::{
    MatchResult, MediaRecord, Strategy, StrategyOutcome,
};
use crate::services::resolver::state::repository::{CandidateRepository, SlugPredicate};
use crate::types::errors::ResolveResult;

/// Fetches candidates for one chain run, fetching the full system listing at
/// most once.
struct CandidateFetcher<'r, R: CandidateRepository + ?Sized> {
    repository: &'r R,
    system_id: &'r str,
    all: Option<Vec<MediaRecord>>,
}

impl<'r, R: CandidateRepository + ?Sized> CandidateFetcher<'r, R> {
    fn new(repository: &'r R, system_id: &'r str) -> Self {
        Self {
            repository,
            system_id,
            all: None,
        }
    }

    fn fetch(&mut self, predicate: &SlugPredicate) -> ResolveResult<Vec<MediaRecord>> {
        if *predicate != SlugPredicate::All {
            return Ok(self.repository.fetch(self.system_id, predicate)?);
        }
        if self.all.is_none() {
            self.all = Some(self.repository.fetch(self.system_id, predicate)?);
        }
        Ok(self.all.clone().unwrap_or_default())
    }

    /// Union of several predicates, keeping first-seen order.
    fn fetch_any(&mut self, predicates: &[SlugPredicate]) -> ResolveResult<Vec<MediaRecord>> {
        if let [single] = predicates {
            return self.fetch(single);
        }
        let mut records: Vec<MediaRecord> = Vec::new();
        for predicate in predicates {
            for record in self.fetch(predicate)? {
                if !records.iter().any(|r| r.path == record.path) {
                    records.push(record);
                }
            }
        }
        Ok(records)
    }
}

/// Run the non-trim chain. Returns the first match, if any.
pub fn run_chain<R: CandidateRepository + ?Sized>(
    ctx: &MatchContext<'_>,
    repository: &R,
) -> ResolveResult<Option<MatchResult>> {
    let mut fetcher = CandidateFetcher::new(repository, ctx.system_id);

    for strategy in Strategy::CHAIN {
        let predicates = strategy.predicates(ctx.query, ctx.thresholds);
        if predicates.is_empty() {
            debug!("[Resolver] {} not applicable to '{}'", strategy, ctx.query.slug);
            continue;
        }
        let records = fetcher.fetch_any(&predicates)?;

        match strategy.attempt(ctx, &records) {
            StrategyOutcome::Decisive(result) => {
                debug!(
                    "[Resolver] {} decisive for '{}' -> {}",
                    strategy, ctx.query.slug, result.name
                );
                return Ok(Some(result));
            }
            StrategyOutcome::Matched(result) => {
                let result = match exact_challenge_predicate(ctx.query, ctx.thresholds) {
                    Some(predicate) if strategy == Strategy::ExactMatch => {
                        let challengers = fetcher.fetch(&predicate)?;
                        challenge_exact(ctx, &records, &challengers, result)
                    }
                    _ => result,
                };
                debug!(
                    "[Resolver] {} matched '{}' -> {}",
                    result.strategy, ctx.query.slug, result.name
                );
                return Ok(Some(result));
            }
            StrategyOutcome::NoMatch => {
                debug!(
                    "[Resolver] {} no match for '{}' ({} candidates)",
                    strategy,
                    ctx.query.slug,
                    records.len()
                );
            }
        }
    }

    Ok(None)
}

/// Drop trailing words from the raw title one at a time and re-run the chain.
///
/// Stops at the first depth that matches, at `max_trim_depth`, or before the
/// title would fall under `min_trim_words`. Trims that normalize to an
/// already-tried slug are skipped.
pub fn run_progressive_trim<R: CandidateRepository + ?Sized>(
    raw_title: &str,
    base: &MatchContext<'_>,
    repository: &R,
) -> ResolveResult<Option<MatchResult>> {
    let cleaned = strip_metadata(raw_title);
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let thresholds = base.thresholds;

    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(base.query.slug.clone());

    for depth in 1..=thresholds.max_trim_depth {
        if words.len() < depth + thresholds.min_trim_words {
            break;
        }
        let trimmed = words[..words.len() - depth].join(" ");
        let query: SlugInfo = match normalize(&trimmed) {
            Ok(query) => query,
            Err(_) => continue,
        };
        if !seen.insert(query.slug.clone()) {
            continue;
        }

        debug!("[Resolver] Trim depth {depth}: '{trimmed}'");
        let ctx = MatchContext {
            query: &query,
            ..*base
        };
        if let Some(inner) = run_chain(&ctx, repository)? {
            return Ok(Some(wrap_trimmed(inner, depth, thresholds)));
        }
    }

    Ok(None)
}

fn wrap_trimmed(
    inner: MatchResult,
    depth: usize,
    thresholds: &MatchThresholds,
) -> MatchResult {
    let decay = (1.0 - thresholds.trim_confidence_decay * depth as f64).max(0.0);
    let confidence = (inner.confidence * decay).clamp(0.0, 1.0);
    MatchResult {
        strategy: Strategy::ProgressiveTrim,
        via: Some(inner.strategy),
        confidence,
        low_confidence: inner.low_confidence || confidence < thresholds.low_confidence_below,
        trimmed_words: depth,
        ..inner
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
