//! Password hashing capability.
//!
//! The user service only ever sees [`PasswordHasher`]; [`Argon2Hasher`] is
//! the production implementation. Plaintext passwords go in, opaque PHC
//! strings come out.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Argon2,
};

use crate::error::{DomainError, DomainResult};
use crate::user::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// One-way hashing and verification of user credentials.
///
/// The user is passed along so implementations may pick per-account
/// parameters; the default implementation ignores it.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for the given user
    fn hash(&self, user: &User, plaintext: &str) -> DomainResult<String>;

    /// Check a plaintext password against the user's stored hash
    fn verify(&self, user: &User, plaintext: &str) -> bool;
}

/// Argon2id hasher with a fresh random salt per hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }

    /// Get Argon2 instance with default config.
    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, _user: &User, plaintext: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| DomainError::password(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify(&self, user: &User, plaintext: &str) -> bool {
        let Some(stored) = user.password_hash.as_deref() else {
            return false;
        };

        match PasswordHash::new(stored) {
            Ok(parsed) => Self::argon2()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
