//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    Unchanged,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use common::{AppError, AppResult};
use domain::{User, CANNOT_DELETE_TRANSIENT_USER};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Storage errors are returned unchanged; no retries happen here.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List every user, oldest first
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert the user if it has no id yet, update it otherwise.
    /// Returns the stored user, with its id assigned.
    async fn save(&self, user: User) -> AppResult<User>;

    /// Delete a persisted user
    async fn delete(&self, user: &User) -> AppResult<()>;
}

/// Concrete implementation of UserRepository backed by SeaORM
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_all(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn save(&self, user: User) -> AppResult<User> {
        let model = match user.id {
            None => {
                let active_model = ActiveModel {
                    id: Set(Uuid::new_v4()),
                    email: Set(user.email),
                    password_hash: Set(user.password_hash),
                    created_at: Set(user.created_at),
                    updated_at: Set(user.updated_at),
                };

                let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
                tracing::debug!(user_id = %model.id, "Inserted user");
                model
            }
            Some(id) => {
                // The id and creation time never change after the first save
                let active_model = ActiveModel {
                    id: Unchanged(id),
                    email: Set(user.email),
                    password_hash: Set(user.password_hash),
                    created_at: Unchanged(user.created_at),
                    updated_at: Set(user.updated_at),
                };

                active_model.update(&self.db).await.map_err(AppError::from)?
            }
        };

        Ok(User::from(model))
    }

    async fn delete(&self, user: &User) -> AppResult<()> {
        let id = user
            .id
            .ok_or_else(|| AppError::invalid_state(CANNOT_DELETE_TRANSIENT_USER))?;

        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
