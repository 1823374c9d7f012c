#![allow(dead_code)]

use std::path::Path;
use std::sync::Once;

use titlematch_lib::services::config::models::{PreferenceProfile, ResolverSettings};
use titlematch_lib::services::resolver::state::repository::InMemoryRepository;
use titlematch_lib::TitleResolver;

static INIT: Once = Once::new();

pub type TestResolver = TitleResolver<InMemoryRepository, PreferenceProfile>;

/// File paths making up the shared test library, as an indexer would see them.
pub const LIBRARY: &[(&str, &str)] = &[
    ("SNES", "/media/snes/Plumber Quest Adventures (Japan).sfc"),
    ("SNES", "/media/snes/Plumber Quest Adventures (USA) (Demo).sfc"),
    ("SNES", "/media/snes/Plumber Quest Adventures (Europe).sfc"),
    ("SNES", "/media/snes/Plumber Quest Adventures (USA) (Beta).sfc"),
    ("SNES", "/media/snes/Plumber Quest Adventures (USA).sfc"),
    ("SNES", "/media/snes/Star Blaster Zero (USA).sfc"),
    ("SNES", "/media/snes/Star Blaster (USA).sfc"),
    ("SNES", "/media/snes/Mystic Quest 4 (USA).sfc"),
    ("NES", "/media/nes/Bubble (USA).nes"),
    ("NES", "/media/nes/Galaxia (USA).nes"),
    ("PC", "/media/pc/Quest Space Crystal.exe"),
    ("PC", "/media/pc/Robot Wars.exe"),
    ("Genesis", "/media/genesis/Dungeons & Dragons (USA).md"),
];

pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub fn library() -> InMemoryRepository {
    InMemoryRepository::from_paths(
        LIBRARY
            .iter()
            .map(|(system, path)| (*system, Path::new(*path))),
    )
}

/// Resolver over the shared library with default settings.
pub fn test_resolver() -> TestResolver {
    init_logging();
    let settings = ResolverSettings::default();
    TitleResolver::new(library(), settings.preferences.clone(), &settings)
}
