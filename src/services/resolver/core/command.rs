//! `System/Title` command parsing.

use crate::types::errors::{ResolveError, ResolveResult};

/// A title command split into its system and title halves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleCommand {
    pub system_id: String,
    pub title: String,
}

impl TitleCommand {
    /// Parse `System/Title`. The first `/` separates the two halves, so the
    /// title itself may contain slashes ("SNES/AC/DC Rocks").
    ///
    /// Rejects empty halves, backslashes and titles wrapped in `*` wildcards,
    /// which belong to path and glob launches rather than title lookups.
    pub fn parse(input: &str) -> ResolveResult<Self> {
        let input = input.trim();
        let Some((system, title)) = input.split_once('/') else {
            return Err(invalid(input, "expected System/Title"));
        };

        let system = system.trim();
        let title = title.trim();

        if system.is_empty() {
            return Err(invalid(input, "system is empty"));
        }
        if title.is_empty() {
            return Err(invalid(input, "title is empty"));
        }
        if input.contains('\\') {
            return Err(invalid(input, "backslashes are not allowed"));
        }
        if title.starts_with('*') || title.ends_with('*') {
            return Err(invalid(input, "wildcards are not allowed"));
        }

        Ok(Self {
            system_id: system.to_string(),
            title: title.to_string(),
        })
    }
}

fn invalid(input: &str, reason: &str) -> ResolveError {
    ResolveError::InvalidQuery(format!("'{input}': {reason}"))
}

#[cfg(test)]
#[path = "tests/command_tests.rs"]
mod tests;
