use serde::Serialize;
use thiserror::Error;

/// Terminal failures surfaced by a resolution call.
///
/// None of these are retried by the engine: fuzzy matching and progressive
/// trimming are the only recovery it performs, and both run before
/// `NoMatchFound` is reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    #[error("Unknown system: {0}")]
    UnknownSystem(String),
    #[error("No match found for title: {system}/{title}")]
    NoMatchFound { system: String, title: String },
    #[error("Repository error: {0}")]
    Repository(String),
}

impl From<RepositoryError> for ResolveError {
    fn from(error: RepositoryError) -> Self {
        ResolveError::Repository(error.to_string())
    }
}

impl Serialize for ResolveError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Failure reported by a candidate repository implementation.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Repository unavailable: {0}")]
    Unavailable(String),
    #[error("Query failed: {0}")]
    Query(String),
}

/// Failure while loading, validating or saving resolver settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod tests;
