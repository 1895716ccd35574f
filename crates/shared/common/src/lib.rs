//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling
//! - Pagination types and the paginator capability
//! - Configuration structures

pub mod config;
pub mod error;
pub mod pagination;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use pagination::{OffsetPaginator, Paginated, PaginationMeta, PaginationParams, Paginator};
