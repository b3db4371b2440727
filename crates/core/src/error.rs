//! Error model shared by the web-tier crates.

use thiserror::Error;

/// Result type used across the web-tier domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Deterministic domain-level failures (validation, identity, policy).
///
/// Transport and backend failures carry their own error types in the
/// session crate; this stays focused on local, deterministic checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found.
    #[error("not found")]
    NotFound,

    /// Authorization failure at the domain boundary.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
