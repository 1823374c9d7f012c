//! Golden corpus harness for strategy and threshold tuning.
//!
//! A fixed library plus a table of queries with the record and strategy each
//! one is expected to land on. Any threshold change that moves a case shows
//! up as a named failure.

use crate::services::config::models::ResolverSettings;
use crate::services::resolver::models::types::Strategy;
use crate::services::resolver::state::repository::InMemoryRepository;
use crate::services::resolver::TitleResolver;
use crate::test_utils::record;

/// Single golden corpus test case.
pub struct GoldenCase {
    pub name: &'static str,
    pub system: &'static str,
    pub title: &'static str,
    pub filter: &'static str,
    /// `None` means the query must fail with no match.
    pub expected_record: Option<&'static str>,
    pub expected_strategy: Option<Strategy>,
}

/// Library shared by every golden case.
pub fn golden_library() -> InMemoryRepository {
    let mut repo = InMemoryRepository::new();
    let entries: &[(&str, &str, &[(&str, &str)])] = &[
        ("SNES", "Plumber Quest Adventures (Japan)", &[("region", "jp")]),
        ("SNES", "Plumber Quest Adventures (USA)", &[("region", "us")]),
        ("SNES", "Plumber Quest Adventures (Europe)", &[("region", "eu")]),
        ("SNES", "Plumber Quest Adventures (USA) (Beta)", &[("region", "us"), ("unfinished", "beta")]),
        ("SNES", "Plumber Quest Adventures (USA) (Demo)", &[("region", "us"), ("unfinished", "demo")]),
        ("SNES", "Dragon Tales: Lost Tower (USA)", &[("region", "us")]),
        ("SNES", "Mystic Quest 4 (USA)", &[("region", "us")]),
        ("SNES", "Quest Space Crystal (USA)", &[("region", "us")]),
        ("SNES", "Star Blaster Zero (USA)", &[("region", "us")]),
        ("SNES", "Star Blaster (USA)", &[("region", "us")]),
        ("SNES", "Rock 'n' Roll Racer (USA)", &[("region", "us")]),
        ("SNES", "Legend of Sword (USA)", &[("region", "us")]),
        ("NES", "Bubble (USA)", &[("region", "us")]),
        ("NES", "Galaxia (USA)", &[("region", "us")]),
        ("NES", "Galaxia (Japan)", &[("region", "jp")]),
        ("Genesis", "Sonic Racer (USA, Europe)", &[("region", "us"), ("region", "eu")]),
    ];
    for (system, name, tags) in entries {
        repo.insert(record(system, name, tags));
    }
    repo
}

pub fn golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            name: "exact_prefers_usa",
            system: "SNES",
            title: "Plumber Quest Adventures",
            filter: "",
            expected_record: Some("Plumber Quest Adventures (USA)"),
            expected_strategy: Some(Strategy::ExactMatch),
        },
        GoldenCase {
            name: "exact_region_filter",
            system: "snes",
            title: "plumber quest adventures",
            filter: "region:eu",
            expected_record: Some("Plumber Quest Adventures (Europe)"),
            expected_strategy: Some(Strategy::ExactMatch),
        },
        GoldenCase {
            name: "exact_beta_on_request",
            system: "SNES",
            title: "Plumber Quest Adventures",
            filter: "unfinished:beta",
            expected_record: Some("Plumber Quest Adventures (USA) (Beta)"),
            expected_strategy: Some(Strategy::ExactMatch),
        },
        GoldenCase {
            name: "roman_numeral_equivalence",
            system: "SNES",
            title: "Mystic Quest IV",
            filter: "",
            expected_record: Some("Mystic Quest 4 (USA)"),
            expected_strategy: Some(Strategy::ExactMatch),
        },
        GoldenCase {
            name: "conjunction_equivalence",
            system: "SNES",
            title: "Rock and Roll Racer",
            filter: "",
            expected_record: Some("Rock 'n' Roll Racer (USA)"),
            expected_strategy: Some(Strategy::ExactMatch),
        },
        GoldenCase {
            name: "secondary_title_alone",
            system: "SNES",
            title: "Lost Tower",
            filter: "",
            expected_record: Some("Dragon Tales: Lost Tower (USA)"),
            expected_strategy: Some(Strategy::SecondaryTitleExact),
        },
        GoldenCase {
            name: "main_title_alone",
            system: "SNES",
            title: "Dragon Tales",
            filter: "",
            expected_record: Some("Dragon Tales: Lost Tower (USA)"),
            expected_strategy: Some(Strategy::MainTitleOnly),
        },
        GoldenCase {
            name: "unknown_subtitle_falls_back_to_main",
            system: "SNES",
            title: "Legend of Sword: Second Edition",
            filter: "",
            expected_record: Some("Legend of Sword (USA)"),
            expected_strategy: Some(Strategy::MainTitleOnly),
        },
        GoldenCase {
            name: "word_order_signature",
            system: "SNES",
            title: "Crystal Space Quest",
            filter: "",
            expected_record: Some("Quest Space Crystal (USA)"),
            expected_strategy: Some(Strategy::TokenSignature),
        },
        GoldenCase {
            name: "fuzzy_typo",
            system: "NES",
            title: "Buble",
            filter: "",
            expected_record: Some("Bubble (USA)"),
            expected_strategy: Some(Strategy::Fuzzy),
        },
        GoldenCase {
            name: "fuzzy_wins_over_trim",
            system: "SNES",
            title: "Star Blaster Zeta",
            filter: "",
            expected_record: Some("Star Blaster Zero (USA)"),
            expected_strategy: Some(Strategy::Fuzzy),
        },
        GoldenCase {
            name: "trim_extra_words",
            system: "Genesis",
            title: "Sonic Racer Turbo Championship Deluxe",
            filter: "",
            expected_record: Some("Sonic Racer (USA, Europe)"),
            expected_strategy: Some(Strategy::ProgressiveTrim),
        },
        GoldenCase {
            name: "excluded_region_has_no_fallback",
            system: "NES",
            title: "Galaxia",
            filter: "-region:us,-region:jp",
            expected_record: None,
            expected_strategy: None,
        },
        GoldenCase {
            name: "nonexistent_title",
            system: "SNES",
            title: "Completely Unrelated Zzzz",
            filter: "",
            expected_record: None,
            expected_strategy: None,
        },
    ]
}

/// Execute a single golden case against a fresh resolver.
pub fn run_golden_case(case: &GoldenCase) {
    let settings = ResolverSettings::default();
    let resolver = TitleResolver::new(golden_library(), settings.preferences.clone(), &settings);
    let outcome = resolver.resolve(case.system, case.title, case.filter);

    match (case.expected_record, outcome) {
        (Some(expected), Ok(result)) => {
            assert_eq!(
                result.name, expected,
                "Golden case '{}': expected '{}', got '{}' via {}",
                case.name, expected, result.name, result.strategy
            );
            if let Some(strategy) = case.expected_strategy {
                assert_eq!(
                    result.strategy, strategy,
                    "Golden case '{}': expected strategy {}, got {}",
                    case.name, strategy, result.strategy
                );
            }
            assert!(
                (0.0..=1.0).contains(&result.confidence),
                "Golden case '{}': confidence out of range",
                case.name
            );
        }
        (None, Err(err)) => {
            assert!(
                matches!(err, crate::types::errors::ResolveError::NoMatchFound { .. }),
                "Golden case '{}': expected NoMatchFound, got {err:?}",
                case.name
            );
        }
        (Some(expected), Err(err)) => {
            panic!("Golden case '{}': expected '{expected}', got error {err:?}", case.name)
        }
        (None, Ok(result)) => {
            panic!(
                "Golden case '{}': expected no match, got '{}' via {}",
                case.name, result.name, result.strategy
            )
        }
    }
}

#[cfg(test)]
#[path = "tests/golden_corpus_tests.rs"]
mod tests;
