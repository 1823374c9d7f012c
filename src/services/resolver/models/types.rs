//! Domain types shared by the resolution pipeline.
//!
//! Contains the indexed record shape (MediaRecord), strategy identifiers,
//! the result contract (MatchResult) and result-cache keys.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::services::resolver::core::normalizer::normalize;
use crate::services::resolver::core::tag_filter::TagFilter;
use crate::services::resolver::core::tags::{parse_filename_tags, Tag, TagType};
use crate::types::errors::{ResolveError, ResolveResult};

// ==================== RECORDS ====================

/// One launchable media entry as stored by the repository.
///
/// Slug fields are derived from `name` with the same normalizer used for
/// queries, so the two sides always compare like for like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Canonical system id the record belongs to.
    pub system_id: String,
    pub path: PathBuf,
    /// Display name, usually the file stem.
    pub name: String,
    pub slug: String,
    pub main_title_slug: String,
    pub secondary_slug: String,
    pub slug_length: usize,
    pub word_count: usize,
    /// Sorted word slugs joined with `_`.
    pub token_signature: String,
    pub tags: Vec<Tag>,
}

impl MediaRecord {
    pub fn new(
        system_id: &str,
        path: impl Into<PathBuf>,
        name: &str,
        tags: Vec<Tag>,
    ) -> ResolveResult<Self> {
        let info = normalize(name)?;
        let mut unique: Vec<Tag> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }

        Ok(Self {
            system_id: system_id.to_string(),
            path: path.into(),
            name: name.to_string(),
            token_signature: info.token_signature(),
            slug: info.slug,
            main_title_slug: info.main_title_slug,
            secondary_slug: info.secondary_slug,
            slug_length: info.slug_length,
            word_count: info.word_count,
            tags: unique,
        })
    }

    /// Build a record from a media file path, reading tags from the file stem.
    pub fn from_path(system_id: &str, path: &Path) -> ResolveResult<Self> {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| {
                ResolveError::InvalidQuery(format!("path has no file name: {}", path.display()))
            })?;
        let tags = parse_filename_tags(&stem);
        Self::new(system_id, path, &stem, tags)
    }

    pub fn has_secondary(&self) -> bool {
        !self.secondary_slug.is_empty()
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    pub fn tags_of<'a>(&'a self, tag_type: &'a TagType) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |t| &t.tag_type == tag_type)
    }
}

// ==================== STRATEGIES ====================

/// Matching strategies, in the order the dispatcher tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    ExactMatch,
    SecondaryTitleExact,
    MainTitleOnly,
    TokenSignature,
    Fuzzy,
    ProgressiveTrim,
}

impl Strategy {
    /// Everything except progressive trimming, which re-runs this chain on
    /// shortened queries.
    pub const CHAIN: [Strategy; 5] = [
        Strategy::ExactMatch,
        Strategy::SecondaryTitleExact,
        Strategy::MainTitleOnly,
        Strategy::TokenSignature,
        Strategy::Fuzzy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::ExactMatch => "exact_match",
            Strategy::SecondaryTitleExact => "secondary_title_exact",
            Strategy::MainTitleOnly => "main_title_only",
            Strategy::TokenSignature => "token_signature",
            Strategy::Fuzzy => "jarowinkler_damerau",
            Strategy::ProgressiveTrim => "progressive_trim",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==================== RESULTS ====================

/// The single winning record for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub path: PathBuf,
    pub name: String,
    pub system_id: String,
    /// Strategy that produced the match.
    pub strategy: Strategy,
    /// For progressive trimming, the strategy that matched the trimmed query.
    pub via: Option<Strategy>,
    /// Match quality in `[0, 1]`.
    pub confidence: f64,
    /// Set when a fuzzy match cleared the floor but not the comfort threshold.
    pub low_confidence: bool,
    /// Slug of the matched record.
    pub matched_slug: String,
    /// Words removed by progressive trimming, zero otherwise.
    pub trimmed_words: usize,
}

impl MatchResult {
    pub fn new(record: &MediaRecord, strategy: Strategy, confidence: f64) -> Self {
        Self {
            path: record.path.clone(),
            name: record.name.clone(),
            system_id: record.system_id.clone(),
            strategy,
            via: None,
            confidence: confidence.clamp(0.0, 1.0),
            low_confidence: false,
            matched_slug: record.slug.clone(),
            trimmed_words: 0,
        }
    }
}

/// Outcome of a single strategy attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    /// Exact match strong enough to end the chain unchallenged.
    Decisive(MatchResult),
    Matched(MatchResult),
    NoMatch,
}

// ==================== QUERIES ====================

/// One resolution request, as entered by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Canonical system id.
    pub system_id: String,
    pub raw_title: String,
    /// Explicit filter-string selectors. Selectors embedded in the title are
    /// carried by `raw_title`.
    pub filter: TagFilter,
}

impl Query {
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            system_id: self.system_id.clone(),
            title: self.raw_title.trim().to_string(),
            filter: self.filter.to_string(),
        }
    }
}

// ==================== CACHE ====================

/// Identity of a resolution request. The title is kept raw (trimmed) so that
/// embedded selectors are part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub system_id: String,
    pub title: String,
    pub filter: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    Resolved(MatchResult),
    NoMatch,
}

#[cfg(test)]
#[path = "tests/types_tests.rs"]
mod tests;
