use super::*;

#[test]
fn test_lookup_is_case_and_punctuation_insensitive() {
    let catalog = SystemCatalog::builtin();
    assert_eq!(catalog.lookup("snes").unwrap().id, "SNES");
    assert_eq!(catalog.lookup("Super Nintendo").unwrap().id, "SNES");
    assert_eq!(catalog.lookup("n64").unwrap().id, "Nintendo64");
    assert_eq!(catalog.lookup("Mega-Drive").unwrap().id, "Genesis");
}

#[test]
fn test_lookup_unknown_system() {
    let catalog = SystemCatalog::builtin();
    assert!(catalog.lookup("Dreamcast").is_none());
    assert!(catalog.lookup("").is_none());
}

#[test]
fn test_register_custom_system() {
    let mut catalog = SystemCatalog::builtin();
    let before = catalog.len();
    assert!(catalog.register(SystemDef::new("Dreamcast", &["DC"])));
    assert_eq!(catalog.len(), before + 1);
    assert_eq!(catalog.lookup("dc").unwrap().id, "Dreamcast");
}

#[test]
fn test_register_conflicting_alias_keeps_first_owner() {
    let mut catalog = SystemCatalog::builtin();
    catalog.register(SystemDef::new("SuperGrafx", &["SNES"]));
    assert_eq!(catalog.lookup("snes").unwrap().id, "SNES");
    assert_eq!(catalog.lookup("supergrafx").unwrap().id, "SuperGrafx");
}

#[test]
fn test_reregister_drops_removed_aliases() {
    let mut catalog = SystemCatalog::builtin();
    let before = catalog.len();
    assert!(catalog.register(SystemDef::new("SNES", &["SuperNES"])));

    assert_eq!(catalog.len(), before);
    assert_eq!(catalog.lookup("supernes").unwrap().id, "SNES");
    assert_eq!(catalog.lookup("snes").unwrap().id, "SNES");
    assert!(catalog.lookup("sfc").is_none());
    assert!(catalog.lookup("Super Famicom").is_none());
}

#[test]
fn test_register_refuses_id_owned_by_other_system() {
    let mut catalog = SystemCatalog::builtin();
    let before = catalog.len();
    assert!(!catalog.register(SystemDef::new("MD", &["MiniDisc"])));

    assert_eq!(catalog.len(), before);
    assert_eq!(catalog.lookup("md").unwrap().id, "Genesis");
    assert!(catalog.lookup("minidisc").is_none());
}
