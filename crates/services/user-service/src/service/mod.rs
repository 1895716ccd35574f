//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure. They depend on
//! abstractions (traits) for dependency inversion.

mod user_service;

pub use user_service::{UserManager, UserService};
