//! Title resolution core.
//!
//! Turns a human-entered title such as `"SNES/Plumber Quest Adventures"` into
//! exactly one media path, with the strategy that found it and a confidence
//! score. See [`services::resolver::TitleResolver`] for the entry point.

pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

pub use services::resolver::TitleResolver;
pub use types::errors::{ResolveError, ResolveResult};
