//! Form shapes submitted by the presentation layer.
//!
//! Forms are plain data with declared constraints. They are checked before
//! reaching the user service, and failures are reported per field.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::constants::{MIN_PASSWORD_LENGTH, PASSWORDS_MUST_MATCH};
use crate::error::{DomainError, DomainResult};
use crate::user::User;

/// A validation failure attached to one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Render a list of errors as `field: message` pairs
    pub fn join(errors: &[FieldError]) -> String {
        errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// User registration submission
#[derive(Clone, Deserialize, Validate)]
pub struct RegistrationForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub password_repeat: String,
}

impl RegistrationForm {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        password_repeat: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            password_repeat: password_repeat.into(),
        }
    }

    /// Build the transient user described by this form.
    ///
    /// The password is not carried over; it must be hashed separately.
    pub fn to_user(&self) -> User {
        User::new(self.email.clone())
    }
}

/// Password change submission for an authenticated user
#[derive(Clone, Deserialize, Validate)]
pub struct ChangePasswordForm {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = MIN_PASSWORD_LENGTH))]
    pub new_password: String,
    #[validate(must_match(other = "new_password"))]
    pub new_password_repeat: String,
}

impl ChangePasswordForm {
    pub fn new(
        current_password: impl Into<String>,
        new_password: impl Into<String>,
        new_password_repeat: impl Into<String>,
    ) -> Self {
        Self {
            current_password: current_password.into(),
            new_password: new_password.into(),
            new_password_repeat: new_password_repeat.into(),
        }
    }
}

// Forms hold plaintext passwords; keep them out of logs.
impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("password_repeat", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for ChangePasswordForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangePasswordForm")
            .field("current_password", &"[REDACTED]")
            .field("new_password", &"[REDACTED]")
            .field("new_password_repeat", &"[REDACTED]")
            .finish()
    }
}

/// Collect every constraint violation of a form, sorted by field name.
pub fn field_errors<T: Validate>(form: &T) -> Vec<FieldError> {
    let Err(errors) = form.validate() else {
        return Vec::new();
    };

    let mut collected: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| default_message(&e.code));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();

    collected.sort_by(|a, b| a.field.cmp(&b.field));
    collected
}

// Password rules carry no literal message; derive it from the shared constants.
fn default_message(code: &str) -> String {
    match code {
        "must_match" => PASSWORDS_MUST_MATCH.to_string(),
        "length" => format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        other => other.to_string(),
    }
}

/// Validate a form, turning any violations into [`DomainError::Form`].
pub fn validate_form<T: Validate>(form: &T) -> DomainResult<()> {
    let errors = field_errors(form);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Form(errors))
    }
}
