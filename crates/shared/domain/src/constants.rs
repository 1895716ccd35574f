//! Domain-level constants.
//!
//! These constants define business rules and user-facing messages.

// =============================================================================
// Pagination
// =============================================================================

/// Number of users shown per page of the user listing
pub const USERS_PER_PAGE: u64 = 10;

/// First page number (pages are 1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Maximum allowed items per page
pub const MAX_PAGE_SIZE: u64 = 100;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Shown when a repeated password does not match the first entry
pub const PASSWORDS_MUST_MATCH: &str = "Passwords must match";

/// Shown when the current password fails verification
pub const INCORRECT_CURRENT_PASSWORD: &str = "Incorrect current password";

// =============================================================================
// Lifecycle
// =============================================================================

/// Raised when deleting a user that was never persisted
pub const CANNOT_DELETE_TRANSIENT_USER: &str = "Cannot delete a user that does not exist.";
