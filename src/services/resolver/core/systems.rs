//! Known systems and alias lookup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A media system (console, computer, arcade board) with its aliases.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SystemDef {
    pub id: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl SystemDef {
    pub fn new(id: &str, aliases: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

const BUILTIN_SYSTEMS: &[(&str, &[&str])] = &[
    ("NES", &["Famicom", "Nintendo"]),
    ("SNES", &["SuperNintendo", "SuperFamicom", "SFC"]),
    ("Genesis", &["MegaDrive", "MD"]),
    ("MasterSystem", &["SMS"]),
    ("GameGear", &["GG"]),
    ("Gameboy", &["GB"]),
    ("GameboyColor", &["GBC"]),
    ("GBA", &["GameboyAdvance"]),
    ("Nintendo64", &["N64"]),
    ("PSX", &["Playstation", "PS1"]),
    ("TurboGrafx16", &["PCEngine", "TG16"]),
    ("NeoGeo", &["AES", "MVS"]),
    ("Atari2600", &["2600", "VCS"]),
    ("Arcade", &["MAME"]),
    ("PC", &["DOS", "Windows"]),
];

/// Case and punctuation insensitive index of system ids and aliases.
#[derive(Debug, Clone, Default)]
pub struct SystemCatalog {
    systems: Vec<SystemDef>,
    index: HashMap<String, usize>,
}

impl SystemCatalog {
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for (id, aliases) in BUILTIN_SYSTEMS {
            catalog.register(SystemDef::new(id, aliases));
        }
        catalog
    }

    /// Add a system, or replace the aliases of an already registered id.
    ///
    /// Alias keys already owned by another system are left to their first
    /// owner. An id that is taken by another system's key is refused, since
    /// it could never be looked up. Returns whether the system was added.
    pub fn register(&mut self, def: SystemDef) -> bool {
        let id_key = lookup_key(&def.id);
        if id_key.is_empty() {
            log::warn!("[Systems] Ignoring system with empty id");
            return false;
        }

        let idx = match self.index.get(&id_key) {
            Some(&existing) if self.systems[existing].id == def.id => {
                self.index.retain(|_, owner| *owner != existing);
                self.systems[existing] = def.clone();
                existing
            }
            Some(&owner) => {
                log::warn!(
                    "[Systems] Id '{}' is already a key of {}, not registering",
                    def.id,
                    self.systems[owner].id
                );
                return false;
            }
            None => {
                self.systems.push(def.clone());
                self.systems.len() - 1
            }
        };

        for key in std::iter::once(&def.id).chain(def.aliases.iter()) {
            let key = lookup_key(key);
            if key.is_empty() {
                continue;
            }
            match self.index.get(&key) {
                Some(&owner) if owner != idx => {
                    log::warn!(
                        "[Systems] Key '{}' for {} already owned by {}",
                        key,
                        def.id,
                        self.systems[owner].id
                    );
                }
                _ => {
                    self.index.insert(key, idx);
                }
            }
        }
        true
    }

    /// Resolve an id or alias such as `snes`, `Super Nintendo` or `N64`.
    pub fn lookup(&self, id: &str) -> Option<&SystemDef> {
        self.index
            .get(&lookup_key(id))
            .and_then(|&idx| self.systems.get(idx))
    }

    pub fn systems(&self) -> &[SystemDef] {
        &self.systems
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

fn lookup_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
#[path = "tests/systems_tests.rs"]
mod tests;
