pub mod analysis;
pub mod core;
pub mod models;
pub mod pipeline;
pub mod state;

#[cfg(test)]
mod golden_corpus;

use std::sync::Mutex;

use log::{info, warn};

use crate::services::config::models::{MatchThresholds, PreferenceProfile, ResolverSettings};
use crate::types::errors::{ResolveError, ResolveResult};
use self::analysis::preference::PreferenceSource;
use self::core::command::TitleCommand;
use self::core::normalizer::normalize;
use self::core::systems::SystemCatalog;
use self::core::tag_filter::{extract_embedded_selectors, TagFilter};
use self::models::types::{CacheEntry, MatchResult, Query};
use self::pipeline::dispatcher::{run_chain, run_progressive_trim};
use self::pipeline::strategies::MatchContext;
use self::state::repository::CandidateRepository;
use self::state::result_cache::ResultCache;

/// Resolves human-entered titles to exactly one media record.
///
/// Holds no per-call state besides the result cache, so one instance can be
/// shared across threads and called concurrently. Preferences are read on
/// every call; when they change, cached outcomes are dropped.
pub struct TitleResolver<R, P> {
    repository: R,
    preferences: P,
    catalog: SystemCatalog,
    thresholds: MatchThresholds,
    cache: ResultCache,
    /// Preferences the cached outcomes were computed with.
    cached_preferences: Mutex<Option<PreferenceProfile>>,
}

impl<R, P> TitleResolver<R, P>
where
    R: CandidateRepository,
    P: PreferenceSource,
{
    pub fn new(repository: R, preferences: P, settings: &ResolverSettings) -> Self {
        let mut catalog = SystemCatalog::builtin();
        for system in &settings.systems {
            catalog.register(system.clone());
        }
        Self {
            repository,
            preferences,
            catalog,
            thresholds: settings.thresholds.clone(),
            cache: ResultCache::new(settings.cache_capacity),
            cached_preferences: Mutex::new(None),
        }
    }

    /// Replace the system catalog. Clears the result cache.
    pub fn with_catalog(mut self, catalog: SystemCatalog) -> Self {
        self.catalog = catalog;
        self.cache.clear();
        self
    }

    pub fn catalog(&self) -> &SystemCatalog {
        &self.catalog
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn preferences(&self) -> &P {
        &self.preferences
    }

    /// Resolve a `System/Title` command string.
    pub fn resolve_command(&self, input: &str, tag_filter: &str) -> ResolveResult<MatchResult> {
        let command = TitleCommand::parse(input)?;
        self.resolve(&command.system_id, &command.title, tag_filter)
    }

    /// Resolve `raw_title` within `system_id`.
    ///
    /// Pipeline:
    /// 1. Look up the system and parse the filter (explicit plus embedded selectors)
    /// 2. Normalize the title, read preferences and consult the result cache
    /// 3. Run the strategy chain, then progressive trimming
    /// 4. If embedded selectors were present and nothing matched, retry without them
    /// 5. Cache the outcome, unless the repository failed
    pub fn resolve(
        &self,
        system_id: &str,
        raw_title: &str,
        tag_filter: &str,
    ) -> ResolveResult<MatchResult> {
        let system = self
            .catalog
            .lookup(system_id)
            .ok_or_else(|| ResolveError::UnknownSystem(system_id.trim().to_string()))?;
        let system_id = system.id.as_str();

        let request = Query {
            system_id: system_id.to_string(),
            raw_title: raw_title.to_string(),
            filter: TagFilter::parse(tag_filter)?,
        };
        let explicit = &request.filter;
        let (embedded, title) = extract_embedded_selectors(raw_title)?;
        let query = normalize(&title)?;

        let prefs = self.preferences.snapshot();
        self.sync_cached_preferences(&prefs);

        let key = request.cache_key();
        if let Some(entry) = self.cache.get(&key) {
            return match entry {
                CacheEntry::Resolved(result) => Ok(result),
                CacheEntry::NoMatch => Err(no_match(system_id, raw_title)),
            };
        }

        let effective = explicit.merged_with(&embedded);
        let ctx = MatchContext {
            system_id,
            query: &query,
            filter: &effective,
            prefs: &prefs,
            thresholds: &self.thresholds,
        };

        let mut outcome = self.run_pipeline(&title, &ctx)?;
        if outcome.is_none() && !embedded.is_empty() {
            info!(
                "[Resolver] No match with embedded tags for '{}', retrying without them",
                raw_title.trim()
            );
            let ctx = MatchContext {
                filter: explicit,
                ..ctx
            };
            outcome = self.run_pipeline(&title, &ctx)?;
        }

        match outcome {
            Some(result) => {
                info!(
                    "[Resolver] {}/{} -> {} via {} ({:.3})",
                    system_id,
                    raw_title.trim(),
                    result.path.display(),
                    result.strategy,
                    result.confidence
                );
                if result.low_confidence {
                    warn!(
                        "[Resolver] Low confidence match for '{}': {} ({:.3})",
                        raw_title.trim(),
                        result.name,
                        result.confidence
                    );
                }
                self.cache.put(key, CacheEntry::Resolved(result.clone()));
                Ok(result)
            }
            None => {
                info!("[Resolver] No match for {}/{}", system_id, raw_title.trim());
                self.cache.put(key, CacheEntry::NoMatch);
                Err(no_match(system_id, raw_title))
            }
        }
    }

    /// Clear the result cache when preferences differ from the ones the
    /// cached outcomes were computed with.
    fn sync_cached_preferences(&self, prefs: &PreferenceProfile) {
        let mut cached = self
            .cached_preferences
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if cached.as_ref() == Some(prefs) {
            return;
        }
        if cached.is_some() {
            info!(
                "[Resolver] Preferences changed, dropping {} cached results",
                self.cache.len()
            );
            self.cache.clear();
        }
        *cached = Some(prefs.clone());
    }

    fn run_pipeline(
        &self,
        title: &str,
        ctx: &MatchContext<'_>,
    ) -> ResolveResult<Option<MatchResult>> {
        let result = run_chain(ctx, &self.repository).map_err(log_repository_failure)?;
        if result.is_some() {
            return Ok(result);
        }
        run_progressive_trim(title, ctx, &self.repository).map_err(log_repository_failure)
    }
}

fn no_match(system_id: &str, raw_title: &str) -> ResolveError {
    ResolveError::NoMatchFound {
        system: system_id.to_string(),
        title: raw_title.trim().to_string(),
    }
}

fn log_repository_failure(error: ResolveError) -> ResolveError {
    if let ResolveError::Repository(msg) = &error {
        warn!("[Resolver] Candidate fetch failed: {msg}");
    }
    error
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
