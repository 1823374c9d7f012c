use super::*;
use tempfile::tempdir;

#[test]
fn test_defaults() {
    let settings = ResolverSettings::default();
    assert_eq!(settings.preferences.regions, vec!["us"]);
    assert_eq!(settings.preferences.langs, vec!["en"]);
    assert_eq!(settings.cache_capacity, 1024);
    assert_eq!(settings.thresholds.min_confidence, 0.60);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_from_json_fills_missing_fields() {
    let settings =
        ResolverSettings::from_json(r#"{"preferences":{"regions":["eu","us"],"langs":[]}}"#)
            .unwrap();
    assert_eq!(settings.preferences.regions, vec!["eu", "us"]);
    assert_eq!(settings.thresholds, MatchThresholds::default());
    assert_eq!(settings.cache_capacity, 1024);
}

#[test]
fn test_from_json_rejects_invalid_thresholds() {
    let err = ResolverSettings::from_json(r#"{"thresholds":{"min_confidence":1.5}}"#)
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = ResolverSettings::from_json(
        r#"{"thresholds":{"min_confidence":0.8,"low_confidence_below":0.7}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_from_json_rejects_zero_windows_and_depths() {
    for json in [
        r#"{"thresholds":{"max_trim_depth":0}}"#,
        r#"{"thresholds":{"fuzzy_min_window":0}}"#,
        r#"{"thresholds":{"min_trim_words":0}}"#,
    ] {
        let err = ResolverSettings::from_json(json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{json}");
    }
}

#[test]
fn test_from_json_rejects_system_id_clashing_with_alias() {
    let err = ResolverSettings::from_json(r#"{"systems":[{"id":"MD","aliases":["MiniDisc"]}]}"#)
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("Genesis")));

    let err = ResolverSettings::from_json(
        r#"{"systems":[{"id":"Dreamcast","aliases":["DC"]},{"id":"dc"}]}"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    // Redefining a built-in id is allowed
    let settings =
        ResolverSettings::from_json(r#"{"systems":[{"id":"SNES","aliases":["SuperNES"]}]}"#)
            .unwrap();
    assert_eq!(settings.systems.len(), 1);
}

#[test]
fn test_from_json_rejects_garbage() {
    let err = ResolverSettings::from_json("not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let service = ConfigService::new(dir.path().join("missing.json"));
    assert_eq!(service.get_settings(), ResolverSettings::default());
}

#[test]
fn test_open_rejects_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("resolver.json");
    fs::write(&path, "{broken").unwrap();

    assert!(matches!(
        ConfigService::open(path.clone()),
        Err(ConfigError::Parse(_))
    ));
    // The lenient constructor falls back to defaults
    assert_eq!(
        ConfigService::new(path).get_settings(),
        ResolverSettings::default()
    );
}

#[test]
fn test_save_normalizes_preference_codes() {
    let dir = tempdir().unwrap();
    let service = ConfigService::new(dir.path().join("resolver.json"));

    let mut settings = service.get_settings();
    settings.preferences.regions = vec![" EU ".into(), "eu".into(), "".into(), "JP".into()];
    service.save_settings(settings).unwrap();

    assert_eq!(service.region_preferences(), vec!["eu", "jp"]);
    assert_eq!(service.snapshot().regions, vec!["eu", "jp"]);
}

#[test]
fn test_save_rejects_invalid_settings_without_writing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("resolver.json");
    let service = ConfigService::new(path.clone());

    let mut settings = service.get_settings();
    settings.cache_capacity = 0;
    assert!(service.save_settings(settings).is_err());
    assert!(!path.exists());
    assert_eq!(service.get_settings().cache_capacity, 1024);
}
