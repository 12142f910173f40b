//! Error types for Pod Reaper
//!
//! Provides a unified error type and rule-specific error variants

use thiserror::Error;

/// Result type alias using ReaperError
pub type Result<T> = std::result::Result<T, ReaperError>;

/// Unified error type for Pod Reaper operations
#[derive(Debug, Error)]
pub enum ReaperError {
    // Rule errors
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Input errors
    #[error("I/O error: {0}")]
    Io(String),

    // Metrics errors
    #[error("Metrics error: {0}")]
    Metrics(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Rule loading errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("invalid {rule} chance {value:?}: {reason}")]
    InvalidChance {
        rule: String,
        value: String,
        reason: String,
    },

    #[error("no rules were loaded")]
    NoRulesLoaded,
}

impl RuleError {
    /// Build an `InvalidChance` error for the given rule and raw value
    pub fn invalid_chance(
        rule: impl Into<String>,
        value: impl Into<String>,
        reason: impl std::fmt::Display,
    ) -> Self {
        RuleError::InvalidChance {
            rule: rule.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

// Implement From for common external error types
impl From<serde_json::Error> for ReaperError {
    fn from(err: serde_json::Error) -> Self {
        ReaperError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ReaperError {
    fn from(err: std::io::Error) -> Self {
        ReaperError::Io(err.to_string())
    }
}

impl From<config::ConfigError> for ReaperError {
    fn from(err: config::ConfigError) -> Self {
        ReaperError::Config(err.to_string())
    }
}

impl From<prometheus::Error> for ReaperError {
    fn from(err: prometheus::Error) -> Self {
        ReaperError::Metrics(err.to_string())
    }
}

impl From<anyhow::Error> for ReaperError {
    fn from(err: anyhow::Error) -> Self {
        ReaperError::Internal(err.to_string())
    }
}
