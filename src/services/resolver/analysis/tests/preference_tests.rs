use super::*;
use crate::test_utils::record;

fn prefs(regions: &[&str], langs: &[&str]) -> PreferenceProfile {
    PreferenceProfile {
        regions: regions.iter().map(|s| s.to_string()).collect(),
        langs: langs.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn test_preferred_beats_untagged_beats_other() {
    let p = prefs(&["us", "eu"], &["en"]);
    let us = record("NES", "Game (USA)", &[("region", "us")]);
    let eu = record("NES", "Game (Europe)", &[("region", "eu")]);
    let none = record("NES", "Game", &[]);
    let jp = record("NES", "Game (Japan)", &[("region", "jp")]);

    let (s_us, s_eu, s_none, s_jp) = (
        tag_score(&us, &p),
        tag_score(&eu, &p),
        tag_score(&none, &p),
        tag_score(&jp, &p),
    );
    assert!(s_us > s_eu, "{s_us} vs {s_eu}");
    assert!(s_eu > s_none, "{s_eu} vs {s_none}");
    assert!(s_none > s_jp, "{s_none} vs {s_jp}");
}

#[test]
fn test_multi_region_record_uses_best_rank() {
    let p = prefs(&["eu", "us"], &[]);
    let multi = record("NES", "Game (USA, Europe)", &[("region", "us"), ("region", "eu")]);
    let us = record("NES", "Game (USA)", &[("region", "us")]);
    assert!(tag_score(&multi, &p) > tag_score(&us, &p));
}

#[test]
fn test_rerelease_penalty() {
    let p = prefs(&["us"], &["en"]);
    let original = record("NES", "Game (USA)", &[("region", "us")]);
    let rerelease = record(
        "NES",
        "Game (USA) (Virtual Console)",
        &[("region", "us"), ("rerelease", "virtualconsole")],
    );
    let diff = tag_score(&original, &p) - tag_score(&rerelease, &p);
    assert!((diff - RERELEASE_PENALTY).abs() < 1e-9);
}

#[test]
fn test_exclusion_selectors() {
    let rec = record("NES", "Game (USA)", &[("region", "us")]);
    assert!(is_admitted(&rec, &TagFilter::default()));
    assert!(!is_admitted(&rec, &TagFilter::parse("-region:us").unwrap()));
    assert!(!is_admitted(&rec, &TagFilter::parse("+region:eu").unwrap()));
    assert!(is_admitted(&rec, &TagFilter::parse("+region:us").unwrap()));
}

#[test]
fn test_variants_excluded_unless_requested() {
    let beta = record("NES", "Game (Beta)", &[("unfinished", "beta")]);
    let bad = record("NES", "Game [b]", &[("dump", "bad")]);
    let hack = record("NES", "Game [h]", &[("unlicensed", "hack")]);
    let unl = record("NES", "Game (Unl)", &[("unlicensed", "unl")]);

    let none = TagFilter::default();
    assert!(!is_admitted(&beta, &none));
    assert!(!is_admitted(&bad, &none));
    assert!(!is_admitted(&hack, &none));
    assert!(is_admitted(&unl, &none));

    assert!(is_admitted(&beta, &TagFilter::parse("unfinished:beta").unwrap()));
    // Excluding a different unfinished value does not lift the default rule
    assert!(!is_admitted(&beta, &TagFilter::parse("-unfinished:demo").unwrap()));
}

#[test]
fn test_preference_source_snapshot() {
    let p = prefs(&["jp"], &["ja"]);
    let snap = p.snapshot();
    assert_eq!(snap.regions, vec!["jp"]);
    assert_eq!(snap.langs, vec!["ja"]);
}
