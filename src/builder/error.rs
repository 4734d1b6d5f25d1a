//! Build errors for the router builder.

use crate::config::ConfigError;
use crate::core::PatternIssue;
use thiserror::Error;

/// Issues found in one route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternReport {
    pub pattern: String,
    pub issues: Vec<PatternIssue>,
}

/// Errors that can occur when building a router.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{} route pattern(s) failed validation", .0.len())]
    InvalidPatterns(Vec<PatternReport>),
}
