//! User Service Library
//!
//! This crate provides user management: listing, registration, password
//! changes and deletion, backed by a SeaORM store. The binary in `main.rs`
//! is a thin CLI over [`UserService`].

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::info;

use common::{AppError, AppResult, OffsetPaginator};
use domain::{Argon2Hasher, ChangePasswordForm, RegistrationForm, UserResponse};

use crate::config::UserServiceConfig;
use crate::infra::Database;
use crate::repository::UserStore;
use crate::service::{UserManager, UserService};

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// User management action type.
pub enum UserAction {
    List {
        page: u64,
        json: bool,
    },
    Register {
        email: String,
        password: String,
        password_repeat: String,
    },
    ChangePassword {
        email: String,
        current_password: String,
        new_password: String,
        new_password_repeat: String,
    },
    Delete {
        email: String,
    },
}

/// Wire the user service with its production collaborators.
pub fn build_service(db: DatabaseConnection) -> UserManager {
    let user_repo = Arc::new(UserStore::new(db));
    UserManager::new(user_repo, Arc::new(Argon2Hasher::new()), Arc::new(OffsetPaginator))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &UserServiceConfig, action: MigrateAction) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Run a user management action against the configured database.
pub async fn run_user_action(config: &UserServiceConfig, action: UserAction) -> AppResult<()> {
    let db = Database::connect(&config.database).await?;
    let service = build_service(db.into_connection());

    match action {
        UserAction::List { page, json } => {
            let users = service.get_paginated_list(page).await?.map(UserResponse::from);

            if json {
                let output = serde_json::to_string_pretty(&users)
                    .map_err(|e| AppError::internal(format!("JSON encoding failed: {}", e)))?;
                println!("{}", output);
            } else {
                println!(
                    "Page {} of {} ({} users)",
                    users.meta.page, users.meta.total_pages, users.meta.total
                );
                for user in &users.data {
                    let id = user.id.map(|id| id.to_string()).unwrap_or_default();
                    println!("  {}  {}  {}", id, user.email, user.created_at.to_rfc3339());
                }
            }
        }
        UserAction::Register {
            email,
            password,
            password_repeat,
        } => {
            let form = RegistrationForm::new(email, password, password_repeat);
            let user = service.register(form).await?;
            println!("Registered {}", user.email);
        }
        UserAction::ChangePassword {
            email,
            current_password,
            new_password,
            new_password_repeat,
        } => {
            let user = service.get_user_by_email(&email).await?;
            let form = ChangePasswordForm::new(current_password, new_password, new_password_repeat);
            service.update_password(&user, form).await?;
            println!("Password changed successfully");
        }
        UserAction::Delete { email } => {
            let user = service.get_user_by_email(&email).await?;
            service.delete(&user).await?;
            println!("Deleted {}", email);
        }
    }

    Ok(())
}
