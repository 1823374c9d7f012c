//! Tag model and the filename tag parser.
//!
//! Tags are `type:value` pairs describing a media record (region, language,
//! development status, dump quality). Record tags come from the bracketed
//! groups in a filename: `Plumber Quest (USA) (Beta) [!]`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TagType {
    Region,
    Lang,
    Unfinished,
    Unlicensed,
    Dump,
    Rerelease,
    Year,
    Rev,
    Other(String),
}

impl TagType {
    pub fn as_str(&self) -> &str {
        match self {
            TagType::Region => "region",
            TagType::Lang => "lang",
            TagType::Unfinished => "unfinished",
            TagType::Unlicensed => "unlicensed",
            TagType::Dump => "dump",
            TagType::Rerelease => "rerelease",
            TagType::Year => "year",
            TagType::Rev => "rev",
            TagType::Other(name) => name,
        }
    }
}

impl From<&str> for TagType {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "region" => TagType::Region,
            "lang" => TagType::Lang,
            "unfinished" => TagType::Unfinished,
            "unlicensed" => TagType::Unlicensed,
            "dump" => TagType::Dump,
            "rerelease" => TagType::Rerelease,
            "year" => TagType::Year,
            "rev" => TagType::Rev,
            other => TagType::Other(other.to_string()),
        }
    }
}

impl From<String> for TagType {
    fn from(value: String) -> Self {
        TagType::from(value.as_str())
    }
}

impl From<TagType> for String {
    fn from(value: TagType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `type:value` tag. Values are stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
    pub tag_type: TagType,
    pub value: String,
}

impl Tag {
    pub fn new(tag_type: impl Into<TagType>, value: impl AsRef<str>) -> Self {
        Self {
            tag_type: tag_type.into(),
            value: value.as_ref().trim().to_lowercase(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tag_type, self.value)
    }
}

static RE_PAREN_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\(\{<]([^\)\}>]*)[\)\}>]").expect("Invalid regex"));

static RE_SQUARE_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("Invalid regex"));

static RE_REV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^rev[\s-]?([a-z0-9.]+)$").expect("Invalid regex"));

static RE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v(\d+(?:\.\d+)*)$").expect("Invalid regex"));

static RE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(19[789]\d|20\d{2})$").expect("Invalid regex"));

static RE_TRANSLATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^t[+-]?([a-z]{2,3})").expect("Invalid regex"));

/// Region names as they appear in No-Intro style filenames.
const REGION_NAMES: &[(&str, &str)] = &[
    ("usa", "us"),
    ("us", "us"),
    ("america", "us"),
    ("europe", "eu"),
    ("japan", "jp"),
    ("world", "world"),
    ("asia", "asia"),
    ("australia", "au"),
    ("brazil", "br"),
    ("canada", "ca"),
    ("china", "cn"),
    ("france", "fr"),
    ("germany", "de"),
    ("hong kong", "hk"),
    ("italy", "it"),
    ("korea", "kr"),
    ("netherlands", "nl"),
    ("russia", "ru"),
    ("spain", "es"),
    ("sweden", "se"),
    ("taiwan", "tw"),
    ("uk", "gb"),
    ("united kingdom", "gb"),
];

/// Two-letter language codes accepted inside a paren group.
const LANG_CODES: &[&str] = &[
    "en", "fr", "de", "es", "it", "ja", "pt", "nl", "sv", "no", "da", "fi", "zh", "ko", "ru",
    "pl", "cs", "el", "hu", "tr", "ar", "he",
];

/// Three-letter translation codes mapped to their two-letter form.
const LANG_ALIASES: &[(&str, &str)] = &[
    ("eng", "en"),
    ("ger", "de"),
    ("fre", "fr"),
    ("spa", "es"),
    ("ita", "it"),
    ("rus", "ru"),
    ("por", "pt"),
    ("bra", "pt"),
    ("dut", "nl"),
    ("swe", "sv"),
    ("nor", "no"),
    ("fin", "fi"),
    ("dan", "da"),
    ("pol", "pl"),
    ("jpn", "ja"),
    ("kor", "ko"),
    ("chi", "zh"),
];

const UNFINISHED_WORDS: &[(&str, &str)] = &[
    ("demo", "demo"),
    ("beta", "beta"),
    ("proto", "proto"),
    ("prototype", "proto"),
    ("alpha", "alpha"),
    ("sample", "sample"),
    ("preview", "preview"),
    ("prerelease", "prerelease"),
    ("pre-release", "prerelease"),
];

const UNLICENSED_WORDS: &[(&str, &str)] = &[
    ("unl", "unl"),
    ("unlicensed", "unl"),
    ("hack", "hack"),
    ("pirate", "bootleg"),
    ("bootleg", "bootleg"),
    ("clone", "clone"),
    ("aftermarket", "aftermarket"),
];

const RERELEASE_WORDS: &[(&str, &str)] = &[
    ("virtual console", "virtualconsole"),
    ("switch online", "switchonline"),
    ("classic mini", "classicmini"),
    ("rerelease", "rerelease"),
    ("re-release", "rerelease"),
    ("collection", "collection"),
];

/// Extract tags from the bracketed groups of a filename.
///
/// Paren-style groups (`()`, `{}`, `<>`) carry region, language, status,
/// revision and year information. Square groups carry dump information.
/// Unrecognized groups are ignored. Order of first appearance is kept and
/// duplicates are dropped.
pub fn parse_filename_tags(filename: &str) -> Vec<Tag> {
    let mut tags: Vec<Tag> = Vec::new();
    let mut push = |tag: Tag| {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    };

    for caps in RE_PAREN_GROUP.captures_iter(filename) {
        let group = caps[1].trim().to_lowercase();
        for tag in parse_paren_group(&group) {
            push(tag);
        }
    }

    for caps in RE_SQUARE_GROUP.captures_iter(filename) {
        let group = caps[1].trim().to_lowercase();
        for tag in parse_square_group(&group) {
            push(tag);
        }
    }

    tags
}

fn parse_paren_group(group: &str) -> Vec<Tag> {
    if let Some(caps) = RE_REV.captures(group) {
        return vec![Tag::new(TagType::Rev, caps[1].replace('.', "-"))];
    }
    if let Some(caps) = RE_VERSION.captures(group) {
        return vec![Tag::new(TagType::Rev, caps[1].replace('.', "-"))];
    }
    if RE_YEAR.is_match(group) {
        return vec![Tag::new(TagType::Year, group)];
    }

    group
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(parse_paren_part)
        .collect()
}

fn parse_paren_part(part: &str) -> Option<Tag> {
    if let Some((_, code)) = REGION_NAMES.iter().find(|(name, _)| *name == part) {
        return Some(Tag::new(TagType::Region, code));
    }
    if LANG_CODES.contains(&part) {
        return Some(Tag::new(TagType::Lang, part));
    }
    if let Some((_, value)) = RERELEASE_WORDS.iter().find(|(name, _)| *name == part) {
        return Some(Tag::new(TagType::Rerelease, value));
    }

    // "Beta 2", "Demo Kiosk", "Proto 1" all key off the first word
    let first_word = part.split([' ', '-']).next().unwrap_or(part);
    if let Some((_, value)) = UNFINISHED_WORDS
        .iter()
        .find(|(name, _)| *name == part || *name == first_word)
    {
        return Some(Tag::new(TagType::Unfinished, value));
    }
    if let Some((_, value)) = UNLICENSED_WORDS.iter().find(|(name, _)| *name == part) {
        return Some(Tag::new(TagType::Unlicensed, value));
    }

    None
}

fn parse_square_group(group: &str) -> Vec<Tag> {
    if group == "!" {
        return vec![Tag::new(TagType::Dump, "verified")];
    }
    if let Some(caps) = RE_TRANSLATION.captures(group) {
        let mut tags = vec![Tag::new(TagType::Unlicensed, "translation")];
        let code = &caps[1];
        let lang = LANG_ALIASES
            .iter()
            .find(|(alias, _)| *alias == code)
            .map(|(_, lang)| *lang)
            .or_else(|| LANG_CODES.iter().find(|c| **c == code).copied());
        if let Some(lang) = lang {
            tags.push(Tag::new(TagType::Lang, lang));
        }
        return tags;
    }
    if group == "hack" || is_coded(group, 'h') {
        return vec![Tag::new(TagType::Unlicensed, "hack")];
    }
    if is_coded(group, 'b') {
        return vec![Tag::new(TagType::Dump, "bad")];
    }
    if is_coded(group, 'o') {
        return vec![Tag::new(TagType::Dump, "overdump")];
    }
    if is_coded(group, 'a') {
        return vec![Tag::new(TagType::Dump, "alternate")];
    }
    if is_coded(group, 'p') {
        return vec![Tag::new(TagType::Unlicensed, "bootleg")];
    }
    Vec::new()
}

/// GoodTools style codes: a letter optionally followed by digits, `[b]`, `[b2]`.
fn is_coded(group: &str, letter: char) -> bool {
    let mut chars = group.chars();
    chars.next() == Some(letter) && chars.all(|c| c.is_ascii_digit())
}

#[cfg(test)]
#[path = "tests/tags_tests.rs"]
mod tests;
