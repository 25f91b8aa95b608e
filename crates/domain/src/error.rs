//! Unified error types for the domain layer
//!
//! Provides a common error type for value-object construction and parsing,
//! so adapters can report bad stored data without resorting to `String`.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., non-finite coordinates)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects and closed tag sets)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for invariant violations.
    ///
    /// # Example
    /// ```ignore
    /// if !lat.is_finite() {
    ///     return Err(DomainError::validation("latitude must be finite"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant, e.g. an instance type tag that
    /// the fleet store wrote but this build does not know.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
