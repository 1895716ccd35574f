//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User domain entity
///
/// A user without an `id` has not been persisted yet. The id is assigned
/// by the repository on first save and never changes afterwards.
#[derive(Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<Uuid>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "[REDACTED]"))
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl User {
    /// Create a transient user with no id and no password hash
    pub fn new(email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            email: email.into(),
            password_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the user has been assigned an id by the repository
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Replace the password hash.
    ///
    /// Only pass values produced by a [`crate::PasswordHasher`].
    pub fn set_password_hash(&mut self, hash: String) {
        self.password_hash = Some(hash);
        self.updated_at = Utc::now();
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Option<Uuid>,
    /// User email address
    pub email: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}
