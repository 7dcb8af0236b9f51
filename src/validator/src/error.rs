//! Error kinds surfaced by validators
//!
//! A query that cannot be parsed and a query that breaks a policy are
//! different failures: the first needs a syntax fix, the second a policy fix.
//! [`Error`] keeps them apart so callers can branch on the kind.

/// The query text is not valid PromQL
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("PromQL syntax error: {message}")]
pub struct PromQLSyntaxError {
    /// Message reported by the parser, unchanged
    pub message: String,
}

impl PromQLSyntaxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The query parsed but violates a configured policy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Name of the validator that rejected the query
    pub rule: &'static str,
    /// Human readable description naming the offending construct
    pub message: String,
}

impl ValidationError {
    pub fn new(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
        }
    }
}

/// Failure of a `validate` call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] PromQLSyntaxError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
