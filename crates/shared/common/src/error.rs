//! Unified error handling.
//!
//! Provides a single error type for the service layer and its callers.
//! Storage errors are wrapped as-is so callers see the original cause.

use domain::{DomainError, FieldError};
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    #[error("Invalid form: {}", FieldError::join(.0))]
    Form(Vec<FieldError>),

    #[error("{0}")]
    InvalidState(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Form(_) => "FORM_ERROR",
            AppError::InvalidState(_) => "INVALID_STATE",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Field-level errors carried by this error, if any
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            AppError::Form(errors) => errors,
            _ => &[],
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) | AppError::InvalidState(msg) => msg.clone(),
            AppError::Form(errors) => FieldError::join(errors),
            AppError::Conflict(msg) => {
                if msg.ends_with("already exists") {
                    msg.clone()
                } else {
                    format!("{} already exists", msg)
                }
            }

            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Form(errors) => AppError::Form(errors),
            DomainError::Password(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        AppError::InvalidState(msg.into())
    }

    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Form(vec![FieldError::new(field, message)])
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
