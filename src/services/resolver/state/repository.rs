//! Candidate record storage.
//!
//! The resolver never walks the filesystem itself. It asks a
//! `CandidateRepository` for records of one system that satisfy a slug
//! predicate, and works only on what comes back.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::services::resolver::models::types::MediaRecord;
use crate::types::errors::{RepositoryError, ResolveResult};

/// Slug conditions a strategy can push down to the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlugPredicate {
    /// Record slug equals the value.
    Exact(String),
    /// Record slug starts with the value.
    Prefix(String),
    /// Record secondary-title slug equals the value.
    Secondary(String),
    /// Every record of the system.
    All,
}

impl SlugPredicate {
    pub fn matches(&self, record: &MediaRecord) -> bool {
        match self {
            SlugPredicate::Exact(slug) => record.slug == *slug,
            SlugPredicate::Prefix(prefix) => record.slug.starts_with(prefix.as_str()),
            SlugPredicate::Secondary(slug) => {
                !record.secondary_slug.is_empty() && record.secondary_slug == *slug
            }
            SlugPredicate::All => true,
        }
    }
}

/// Source of indexed media records.
///
/// Implementations must return records in a stable discovery order; ties
/// between equally good candidates fall back to that order.
pub trait CandidateRepository: Send + Sync {
    fn fetch(
        &self,
        system_id: &str,
        predicate: &SlugPredicate,
    ) -> Result<Vec<MediaRecord>, RepositoryError>;
}

impl<T: CandidateRepository + ?Sized> CandidateRepository for Arc<T> {
    fn fetch(
        &self,
        system_id: &str,
        predicate: &SlugPredicate,
    ) -> Result<Vec<MediaRecord>, RepositoryError> {
        (**self).fetch(system_id, predicate)
    }
}

impl<T: CandidateRepository + ?Sized> CandidateRepository for &T {
    fn fetch(
        &self,
        system_id: &str,
        predicate: &SlugPredicate,
    ) -> Result<Vec<MediaRecord>, RepositoryError> {
        (**self).fetch(system_id, predicate)
    }
}

/// Repository backed by per-system vectors kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    systems: HashMap<String, Vec<MediaRecord>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: MediaRecord) {
        self.systems
            .entry(record.system_id.clone())
            .or_default()
            .push(record);
    }

    /// Index a media file, deriving its name and tags from the file stem.
    pub fn insert_path(&mut self, system_id: &str, path: &Path) -> ResolveResult<()> {
        let record = MediaRecord::from_path(system_id, path)?;
        self.insert(record);
        Ok(())
    }

    /// Build a repository from `(system_id, path)` pairs. Paths whose names
    /// do not normalize to anything are skipped with a warning.
    pub fn from_paths<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a Path)>,
    {
        let mut repo = Self::new();
        for (system_id, path) in entries {
            if let Err(e) = repo.insert_path(system_id, path) {
                log::warn!("[Repository] Skipping {}: {}", path.display(), e);
            }
        }
        repo
    }

    pub fn len(&self) -> usize {
        self.systems.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CandidateRepository for InMemoryRepository {
    fn fetch(
        &self,
        system_id: &str,
        predicate: &SlugPredicate,
    ) -> Result<Vec<MediaRecord>, RepositoryError> {
        Ok(self
            .systems
            .get(system_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| predicate.matches(r))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "tests/repository_tests.rs"]
mod tests;
