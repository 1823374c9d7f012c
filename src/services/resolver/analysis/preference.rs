//! Tag-based candidate admission and preference scoring.

use std::sync::Arc;

use crate::services::config::models::PreferenceProfile;
use crate::services::resolver::core::tag_filter::TagFilter;
use crate::services::resolver::core::tags::{Tag, TagType};
use crate::services::resolver::models::types::MediaRecord;

/// Subtracted from re-releases so an original release wins an otherwise even
/// comparison.
pub const RERELEASE_PENALTY: f64 = 0.01;

/// Unlicensed values treated as variants. Plain unlicensed releases are kept.
const VARIANT_UNLICENSED: &[&str] = &["hack", "translation", "bootleg", "clone"];

/// Supplies the user's ordered region and language preferences.
///
/// Read once per resolution; implementations may change between calls.
pub trait PreferenceSource: Send + Sync {
    fn region_preferences(&self) -> Vec<String>;
    fn lang_preferences(&self) -> Vec<String>;

    fn snapshot(&self) -> PreferenceProfile {
        PreferenceProfile {
            regions: self.region_preferences(),
            langs: self.lang_preferences(),
        }
    }
}

impl<T: PreferenceSource + ?Sized> PreferenceSource for Arc<T> {
    fn region_preferences(&self) -> Vec<String> {
        (**self).region_preferences()
    }

    fn lang_preferences(&self) -> Vec<String> {
        (**self).lang_preferences()
    }

    fn snapshot(&self) -> PreferenceProfile {
        (**self).snapshot()
    }
}

impl<T: PreferenceSource + ?Sized> PreferenceSource for &T {
    fn region_preferences(&self) -> Vec<String> {
        (**self).region_preferences()
    }

    fn lang_preferences(&self) -> Vec<String> {
        (**self).lang_preferences()
    }

    fn snapshot(&self) -> PreferenceProfile {
        (**self).snapshot()
    }
}

impl PreferenceSource for PreferenceProfile {
    fn region_preferences(&self) -> Vec<String> {
        self.regions.clone()
    }

    fn lang_preferences(&self) -> Vec<String> {
        self.langs.clone()
    }

    fn snapshot(&self) -> PreferenceProfile {
        self.clone()
    }
}

/// True when the record survives the filter.
///
/// A record is dropped if it carries any excluded tag, lacks any included
/// tag, or is a variant release (unfinished, hacked, bad dump) that the
/// filter did not explicitly ask for.
pub fn is_admitted(record: &MediaRecord, filter: &TagFilter) -> bool {
    if filter.excludes().any(|tag| record.has_tag(tag)) {
        return false;
    }
    if !filter.includes().all(|tag| record.has_tag(tag)) {
        return false;
    }
    !is_excluded_variant(record, filter)
}

fn is_excluded_variant(record: &MediaRecord, filter: &TagFilter) -> bool {
    record.tags.iter().any(|tag| {
        let is_variant = match &tag.tag_type {
            TagType::Unfinished => true,
            TagType::Unlicensed => VARIANT_UNLICENSED.contains(&tag.value.as_str()),
            TagType::Dump => tag.value == "bad",
            _ => false,
        };
        is_variant && !filter.requests_type(&tag.tag_type)
    })
}

/// Preference score of a record's tags. Higher is better.
///
/// Region and language are scored independently and summed. A value at
/// preference rank `r` scores `1 / (1 + r)`. A record with no tag in a
/// dimension scores below any preferred value but above a non-preferred one.
pub fn tag_score(record: &MediaRecord, prefs: &PreferenceProfile) -> f64 {
    let mut score = dimension_score(record, &TagType::Region, &prefs.regions)
        + dimension_score(record, &TagType::Lang, &prefs.langs);
    if record.tags_of(&TagType::Rerelease).next().is_some() {
        score -= RERELEASE_PENALTY;
    }
    score
}

fn dimension_score(record: &MediaRecord, tag_type: &TagType, preferred: &[String]) -> f64 {
    let values: Vec<&Tag> = record.tags_of(tag_type).collect();
    if values.is_empty() {
        return 0.5 / (1.0 + preferred.len() as f64);
    }
    values
        .iter()
        .filter_map(|tag| preferred.iter().position(|p| p.eq_ignore_ascii_case(&tag.value)))
        .map(|rank| 1.0 / (1.0 + rank as f64))
        .fold(0.0, f64::max)
}

#[cfg(test)]
#[path = "tests/preference_tests.rs"]
mod tests;
