//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (CLI, database).

use thiserror::Error;

use crate::form::FieldError;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// One or more form fields were rejected
    #[error("Invalid form: {}", FieldError::join(.0))]
    Form(Vec<FieldError>),

    /// Password hashing failed
    #[error("Password error: {0}")]
    Password(String),
}

impl DomainError {
    /// Create a password error
    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
