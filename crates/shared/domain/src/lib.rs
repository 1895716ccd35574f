//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the user entity, password hashing, and the form shapes that feed the
//! user service.

pub mod constants;
pub mod error;
pub mod form;
pub mod password;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use form::{field_errors, validate_form, ChangePasswordForm, FieldError, RegistrationForm};
pub use password::{Argon2Hasher, PasswordHasher};
pub use user::{User, UserResponse};

#[cfg(any(test, feature = "test-utils"))]
pub use password::MockPasswordHasher;
