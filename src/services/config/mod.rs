pub mod models;

pub use models::*;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::services::resolver::analysis::preference::PreferenceSource;
use crate::types::errors::ConfigError;

/// JSON-file backed settings store.
///
/// Settings are loaded once on construction and kept in memory. Saving writes
/// to a sibling temp file and renames it over the target so readers never
/// see a half-written file.
pub struct ConfigService {
    path: PathBuf,
    settings: Mutex<ResolverSettings>,
}

impl ConfigService {
    /// Open the store at `path`. A missing or unreadable file yields defaults.
    pub fn new(path: PathBuf) -> Self {
        let settings = Self::load_from_file(&path);
        Self {
            path,
            settings: Mutex::new(settings),
        }
    }

    /// Open the store at `path`, failing on unreadable or invalid content.
    /// A missing file still yields defaults.
    pub fn open(path: PathBuf) -> Result<Self, ConfigError> {
        let settings = if path.exists() {
            ResolverSettings::from_json(&fs::read_to_string(&path)?)?
        } else {
            ResolverSettings::default()
        };
        Ok(Self {
            path,
            settings: Mutex::new(settings),
        })
    }

    fn load_from_file(path: &Path) -> ResolverSettings {
        if !path.exists() {
            return ResolverSettings::default();
        }
        let loaded = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|content| ResolverSettings::from_json(&content));
        match loaded {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("[Config] Failed to load settings from {}: {e}", path.display());
                ResolverSettings::default()
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_settings(&self) -> ResolverSettings {
        self.settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn save_settings(&self, mut new_settings: ResolverSettings) -> Result<(), ConfigError> {
        new_settings.preferences.regions = normalize_codes(&new_settings.preferences.regions);
        new_settings.preferences.langs = normalize_codes(&new_settings.preferences.langs);
        new_settings.validate()?;

        self.write_atomic(&new_settings)?;

        *self
            .settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = new_settings;
        Ok(())
    }

    fn write_atomic(&self, settings: &ResolverSettings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(settings)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl PreferenceSource for ConfigService {
    fn region_preferences(&self) -> Vec<String> {
        self.settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .preferences
            .regions
            .clone()
    }

    fn lang_preferences(&self) -> Vec<String> {
        self.settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .preferences
            .langs
            .clone()
    }

    fn snapshot(&self) -> PreferenceProfile {
        self.settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .preferences
            .clone()
    }
}

// ── Helpers ──────────────────────────────────────────

fn normalize_codes(codes: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for code in codes {
        let next = code.trim().to_lowercase();
        if next.is_empty() || normalized.contains(&next) {
            continue;
        }
        normalized.push(next);
    }

    normalized
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
