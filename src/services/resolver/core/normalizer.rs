//! Slug normalization for media titles.
//! Query input and indexed record names go through the same pipeline, so two
//! slugs compare equal exactly when the titles are considered the same game.

use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;

use crate::types::errors::{ResolveError, ResolveResult};

/// Bracketed metadata groups: `(USA)`, `[!]`, `{Hack}`, `<Beta>`.
static RE_METADATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:\([^)]*\)|\[[^\]]*\]|\{[^}]*\}|<[^>]*>)").expect("Invalid regex")
});

/// List-style numbering such as `1. ` or `01 - ` in front of a title.
static RE_NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,3}(?:\.\s+|\s+-\s+)").expect("Invalid regex"));

static RE_TRAILING_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*the$").expect("Invalid regex"));

static RE_PLUS_CONJUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s\+\s").expect("Invalid regex"));

static RE_N_CONJUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s'?n'?\s").expect("Invalid regex"));

const LEADING_ARTICLES: &[&str] = &["the ", "a ", "an "];

/// Roman numerals rewritten to digits. Lone `x` is left alone so titles like
/// "Mega Man X" keep their letter.
const ROMAN_NUMERALS: &[(&str, &str)] = &[
    ("i", "1"),
    ("ii", "2"),
    ("iii", "3"),
    ("iv", "4"),
    ("v", "5"),
    ("vi", "6"),
    ("vii", "7"),
    ("viii", "8"),
    ("ix", "9"),
    ("xi", "11"),
    ("xii", "12"),
    ("xiii", "13"),
    ("xiv", "14"),
    ("xv", "15"),
    ("xvi", "16"),
    ("xvii", "17"),
    ("xviii", "18"),
    ("xix", "19"),
    ("xx", "20"),
];

/// Normalized form of a title plus the structural facts matching needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugInfo {
    /// Lowercase ASCII alphanumeric slug of the full title.
    pub slug: String,
    pub slug_length: usize,
    pub word_count: usize,
    /// Slug of the part before the first `:` or ` - ` separator.
    pub main_title_slug: String,
    /// Slug of the part after the separator, empty when there is none.
    pub secondary_slug: String,
    /// Per-word slugs in title order, main segment first.
    pub tokens: Vec<String>,
}

impl SlugInfo {
    pub fn has_secondary(&self) -> bool {
        !self.secondary_slug.is_empty()
    }

    /// Order-independent form of the title: sorted tokens joined with `_`.
    pub fn token_signature(&self) -> String {
        token_signature(&self.tokens)
    }
}

pub fn token_signature(tokens: &[String]) -> String {
    let mut sorted: Vec<&str> = tokens.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    sorted.join("_")
}

/// Normalize a raw title into its slug form.
///
/// Pipeline:
/// 1. Transliterate to ASCII via deunicode and lowercase
/// 2. Strip bracketed metadata and list-number prefixes
/// 3. Split main/secondary title on the earliest `:` or ` - `
/// 4. Drop a leading article (`the`, `a`, `an`) and trailing `, the` from the main title
/// 5. Rewrite `&`, ` + ` and ` 'n' ` to `and`
/// 6. Strip punctuation per word, converting roman numerals to digits
///
/// Returns `InvalidQuery` if nothing alphanumeric survives.
pub fn normalize(title: &str) -> ResolveResult<SlugInfo> {
    let latin = deunicode(title).replace('_', " ").to_lowercase();
    let without_meta = strip_metadata(&latin);
    let trimmed = RE_NUMBER_PREFIX.replace(without_meta.trim(), "");

    let (main_raw, secondary_raw) = split_secondary(trimmed.trim());

    let main_clean = strip_articles(main_raw);
    let main_tokens = tokenize_segment(&expand_conjunctions(&main_clean));
    let secondary_tokens = secondary_raw
        .map(|s| tokenize_segment(&expand_conjunctions(s)))
        .unwrap_or_default();

    let main_title_slug = main_tokens.concat();
    let secondary_slug = secondary_tokens.concat();
    let slug = format!("{main_title_slug}{secondary_slug}");

    if slug.is_empty() {
        return Err(ResolveError::InvalidQuery(format!(
            "title '{}' has no alphanumeric content",
            title.trim()
        )));
    }

    let mut tokens = main_tokens;
    tokens.extend(secondary_tokens);

    Ok(SlugInfo {
        slug_length: slug.len(),
        word_count: tokens.len(),
        slug,
        main_title_slug,
        secondary_slug,
        tokens,
    })
}

/// Remove bracketed metadata groups and collapse what is left.
pub fn strip_metadata(title: &str) -> String {
    RE_METADATA.replace_all(title, "").trim().to_string()
}

/// Split on whichever of `:` or ` - ` comes first. A separator with nothing
/// on one side is not treated as a split.
fn split_secondary(title: &str) -> (&str, Option<&str>) {
    let colon = title.find(':').map(|i| (i, 1));
    let dash = title.find(" - ").map(|i| (i, 3));

    let split = match (colon, dash) {
        (Some(c), Some(d)) => Some(if c.0 <= d.0 { c } else { d }),
        (c, d) => c.or(d),
    };

    match split {
        Some((idx, width)) => {
            let main = title[..idx].trim();
            let secondary = title[idx + width..].trim();
            if main.is_empty() || !has_alnum(main) || !has_alnum(secondary) {
                (title, None)
            } else {
                (main, Some(secondary))
            }
        }
        None => (title, None),
    }
}

fn strip_articles(main: &str) -> String {
    let mut result = main.trim();
    for article in LEADING_ARTICLES {
        if let Some(rest) = result.strip_prefix(article) {
            if has_alnum(rest) {
                result = rest.trim_start();
            }
            break;
        }
    }
    RE_TRAILING_ARTICLE.replace(result, "").to_string()
}

fn expand_conjunctions(segment: &str) -> String {
    let amp = segment.replace('&', " and ");
    let plus = RE_PLUS_CONJUNCTION.replace_all(&amp, " and ");
    RE_N_CONJUNCTION.replace_all(&plus, " and ").to_string()
}

/// Split a segment into word slugs. Punctuation is stripped inside each word,
/// so "Spider-Man" stays one word while "Mega Man" is two.
fn tokenize_segment(segment: &str) -> Vec<String> {
    segment
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .enumerate()
        .map(|(idx, word)| convert_roman(idx, word))
        .collect()
}

fn convert_roman(position: usize, word: String) -> String {
    // A leading "I" is a pronoun far more often than a numeral.
    if position == 0 && word == "i" {
        return word;
    }
    ROMAN_NUMERALS
        .iter()
        .find(|(numeral, _)| *numeral == word)
        .map(|(_, digits)| digits.to_string())
        .unwrap_or(word)
}

fn has_alnum(text: &str) -> bool {
    text.chars().any(|c| c.is_alphanumeric())
}

#[cfg(test)]
#[path = "tests/normalizer_tests.rs"]
mod tests;
