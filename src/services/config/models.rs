use serde::{Deserialize, Serialize};

use crate::services::resolver::core::systems::{SystemCatalog, SystemDef};
use crate::services::resolver::state::result_cache::DEFAULT_CACHE_CAPACITY;
use crate::types::errors::ConfigError;

/// Ordered region and language preferences. Earlier entries win.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PreferenceProfile {
    pub regions: Vec<String>,
    pub langs: Vec<String>,
}

impl Default for PreferenceProfile {
    fn default() -> Self {
        Self {
            regions: vec!["us".into()],
            langs: vec!["en".into()],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MatchThresholds {
    /// Fuzzy matches below this similarity are discarded.
    pub min_confidence: f64,
    /// Fuzzy matches below this similarity are flagged `low_confidence`.
    pub low_confidence_below: f64,
    /// Tag score at which an exact match ends the chain without being
    /// challenged by subtitle matches.
    pub early_exit_tag_score: f64,
    pub fuzzy_min_window: usize,
    pub fuzzy_window_divisor: usize,
    pub fuzzy_jaro_weight: f64,
    pub min_signature_tokens: usize,
    pub min_secondary_slug_len: usize,
    pub max_trim_depth: usize,
    /// Trimming never leaves fewer words than this.
    pub min_trim_words: usize,
    /// Confidence lost per trimmed word.
    pub trim_confidence_decay: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            min_confidence: 0.60,
            low_confidence_below: 0.70,
            early_exit_tag_score: 1.0,
            fuzzy_min_window: 2,
            fuzzy_window_divisor: 4,
            fuzzy_jaro_weight: 0.7,
            min_signature_tokens: 2,
            min_secondary_slug_len: 4,
            max_trim_depth: 3,
            min_trim_words: 2,
            trim_confidence_decay: 0.05,
        }
    }
}

impl MatchThresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {value}"
                )))
            }
        };
        unit("min_confidence", self.min_confidence)?;
        unit("low_confidence_below", self.low_confidence_below)?;
        unit("fuzzy_jaro_weight", self.fuzzy_jaro_weight)?;
        unit("trim_confidence_decay", self.trim_confidence_decay)?;

        if self.low_confidence_below < self.min_confidence {
            return Err(ConfigError::Invalid(
                "low_confidence_below must not be lower than min_confidence".into(),
            ));
        }
        if self.fuzzy_window_divisor == 0 {
            return Err(ConfigError::Invalid(
                "fuzzy_window_divisor must be positive".into(),
            ));
        }
        if self.fuzzy_min_window == 0 {
            return Err(ConfigError::Invalid("fuzzy_min_window must be positive".into()));
        }
        if self.max_trim_depth == 0 {
            return Err(ConfigError::Invalid("max_trim_depth must be positive".into()));
        }
        if self.min_trim_words == 0 {
            return Err(ConfigError::Invalid("min_trim_words must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ResolverSettings {
    pub preferences: PreferenceProfile,
    pub thresholds: MatchThresholds,
    pub cache_capacity: usize,
    /// Systems registered on top of the built-in catalog.
    pub systems: Vec<SystemDef>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            preferences: PreferenceProfile::default(),
            thresholds: MatchThresholds::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            systems: Vec::new(),
        }
    }
}

impl ResolverSettings {
    /// Parse and validate settings. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: ResolverSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid("cache_capacity must be positive".into()));
        }
        if let Some(bad) = self.systems.iter().find(|s| s.id.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "system with aliases {:?} has an empty id",
                bad.aliases
            )));
        }

        let mut catalog = SystemCatalog::builtin();
        for system in &self.systems {
            if let Some(owner) = catalog.lookup(&system.id) {
                if owner.id != system.id {
                    return Err(ConfigError::Invalid(format!(
                        "system id '{}' is already a key of {}",
                        system.id, owner.id
                    )));
                }
            }
            catalog.register(system.clone());
        }
        Ok(())
    }
}
