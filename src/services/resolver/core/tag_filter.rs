//! User tag filters.
//!
//! A filter is a comma-separated list of selectors: `+region:eu,-unfinished:demo`.
//! A bare `type:value` is an include. Filters can also be embedded in the
//! title itself as parenthesized selectors, `Plumber Quest (-unfinished:beta)`.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use super::tags::{Tag, TagType};
use crate::types::errors::{ResolveError, ResolveResult};

static RE_TYPE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_-]*$").expect("Invalid regex"));

/// Parenthesized selector embedded in a title.
static RE_EMBEDDED_SELECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([+~-]?)([a-zA-Z][a-zA-Z0-9_-]*):([^)]+)\)").expect("Invalid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Include,
    Exclude,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagSelector {
    pub polarity: Polarity,
    pub tag: Tag,
}

impl TagSelector {
    /// Parse a single selector token. Returns `Ok(None)` for tokens that are
    /// empty or carry an empty value.
    pub fn parse(token: &str) -> ResolveResult<Option<Self>> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(None);
        }

        let (polarity, body) = match token.chars().next() {
            Some('+') | Some('~') => (Polarity::Include, &token[1..]),
            Some('-') => (Polarity::Exclude, &token[1..]),
            _ => (Polarity::Include, token),
        };

        let Some((type_name, value)) = body.split_once(':') else {
            return Err(malformed(token));
        };
        let type_name = type_name.trim().to_lowercase();
        if !RE_TYPE_NAME.is_match(&type_name) {
            return Err(malformed(token));
        }
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        if value.contains(':') {
            return Err(malformed(token));
        }

        Ok(Some(Self {
            polarity,
            tag: Tag::new(type_name, value),
        }))
    }

    pub fn is_include(&self) -> bool {
        self.polarity == Polarity::Include
    }
}

impl fmt::Display for TagSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.polarity {
            Polarity::Include => '+',
            Polarity::Exclude => '-',
        };
        write!(f, "{sign}{}", self.tag)
    }
}

fn malformed(token: &str) -> ResolveError {
    ResolveError::InvalidQuery(format!("malformed tag selector '{token}'"))
}

/// Parsed include/exclude selectors, kept in the order they were written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TagFilter {
    selectors: Vec<TagSelector>,
}

impl TagFilter {
    /// Parse a raw filter string. Empty input yields an empty filter.
    pub fn parse(raw: &str) -> ResolveResult<Self> {
        let mut filter = TagFilter::default();
        for token in raw.split(',') {
            if let Some(selector) = TagSelector::parse(token)? {
                filter.push(selector);
            }
        }
        Ok(filter)
    }

    fn push(&mut self, selector: TagSelector) {
        if !self.selectors.contains(&selector) {
            self.selectors.push(selector);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    pub fn selectors(&self) -> &[TagSelector] {
        &self.selectors
    }

    pub fn includes(&self) -> impl Iterator<Item = &Tag> {
        self.selectors
            .iter()
            .filter(|s| s.polarity == Polarity::Include)
            .map(|s| &s.tag)
    }

    pub fn excludes(&self) -> impl Iterator<Item = &Tag> {
        self.selectors
            .iter()
            .filter(|s| s.polarity == Polarity::Exclude)
            .map(|s| &s.tag)
    }

    /// True when an include selector names this tag type. Used to lift the
    /// default exclusion of variant releases.
    pub fn requests_type(&self, tag_type: &TagType) -> bool {
        self.includes().any(|t| &t.tag_type == tag_type)
    }

    fn mentions_type(&self, tag_type: &TagType) -> bool {
        self.selectors.iter().any(|s| &s.tag.tag_type == tag_type)
    }

    /// Combine explicit selectors with ones extracted from the title. For any
    /// tag type the explicit filter mentions, embedded selectors of that type
    /// are dropped.
    pub fn merged_with(&self, embedded: &TagFilter) -> TagFilter {
        let mut merged = self.clone();
        for selector in &embedded.selectors {
            if !self.mentions_type(&selector.tag.tag_type) {
                merged.push(selector.clone());
            }
        }
        merged
    }
}

/// Canonical serialization, used as part of the result cache key.
impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, selector) in self.selectors.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{selector}")?;
        }
        Ok(())
    }
}

/// Pull `(type:value)` selectors out of a raw title.
///
/// Returns the embedded filter and the title with those groups removed.
/// Ordinary metadata groups such as `(USA)` are left in place.
pub fn extract_embedded_selectors(title: &str) -> ResolveResult<(TagFilter, String)> {
    let mut filter = TagFilter::default();
    for caps in RE_EMBEDDED_SELECTOR.captures_iter(title) {
        let token = format!("{}{}:{}", &caps[1], &caps[2], &caps[3]);
        if let Some(selector) = TagSelector::parse(&token)? {
            filter.push(selector);
        }
    }

    if filter.is_empty() {
        return Ok((filter, title.to_string()));
    }

    let remaining = RE_EMBEDDED_SELECTOR.replace_all(title, " ");
    let remaining = remaining.split_whitespace().collect::<Vec<_>>().join(" ");
    Ok((filter, remaining))
}

#[cfg(test)]
#[path = "tests/tag_filter_tests.rs"]
mod tests;
