//! User service - Handles user-related business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.
//! This is the only place that hashes passwords or writes users.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt, Paginated, PaginationParams, Paginator};
use domain::{
    validate_form, ChangePasswordForm, PasswordHasher, RegistrationForm, User,
    CANNOT_DELETE_TRANSIENT_USER, DEFAULT_PAGE_NUMBER, INCORRECT_CURRENT_PASSWORD, USERS_PER_PAGE,
};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get one page of users (1-indexed, fixed page size)
    async fn get_paginated_list(&self, page: u64) -> AppResult<Paginated<User>>;

    /// Get user by email
    async fn get_user_by_email(&self, email: &str) -> AppResult<User>;

    /// Persist a user as-is (insert or update)
    async fn save(&self, user: User) -> AppResult<User>;

    /// Delete a persisted user
    async fn delete(&self, user: &User) -> AppResult<()>;

    /// Hash and store a new password. The caller must have verified the
    /// current password already.
    ///
    /// `user` is not modified: the new hash is set on a copy, and that saved
    /// copy is returned. Use the returned value from here on, since the
    /// caller's `user` still carries the old hash.
    async fn change_password(&self, user: &User, new_password: &str) -> AppResult<User>;

    /// Verify the current password, then change it
    async fn update_password(&self, user: &User, form: ChangePasswordForm) -> AppResult<User>;

    /// Register a new user from a submitted form
    async fn register(&self, form: RegistrationForm) -> AppResult<User>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    paginator: Arc<dyn Paginator<User>>,
}

impl UserManager {
    /// Create new user service instance
    pub fn new(
        repo: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        paginator: Arc<dyn Paginator<User>>,
    ) -> Self {
        Self {
            repo,
            hasher,
            paginator,
        }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_paginated_list(&self, page: u64) -> AppResult<Paginated<User>> {
        if page < DEFAULT_PAGE_NUMBER {
            return Err(AppError::validation("Page number must be a positive integer"));
        }

        let users = self.repo.find_all().await?;
        let params = PaginationParams::new(page, USERS_PER_PAGE);

        Ok(self.paginator.paginate(users, &params))
    }

    async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.repo.find_by_email(email).await?.ok_or_not_found()
    }

    async fn save(&self, user: User) -> AppResult<User> {
        self.repo.save(user).await
    }

    async fn delete(&self, user: &User) -> AppResult<()> {
        if !user.is_persisted() {
            return Err(AppError::invalid_state(CANNOT_DELETE_TRANSIENT_USER));
        }

        self.repo.delete(user).await?;
        tracing::info!(user_id = ?user.id, "User deleted");
        Ok(())
    }

    async fn change_password(&self, user: &User, new_password: &str) -> AppResult<User> {
        let hash = self.hasher.hash(user, new_password)?;

        let mut updated = user.clone();
        updated.set_password_hash(hash);

        let saved = self.repo.save(updated).await?;
        tracing::info!(user_id = ?saved.id, "Password changed");
        Ok(saved)
    }

    async fn update_password(&self, user: &User, form: ChangePasswordForm) -> AppResult<User> {
        validate_form(&form)?;

        if !self.hasher.verify(user, &form.current_password) {
            tracing::warn!(user_id = ?user.id, "Password change rejected: current password mismatch");
            return Err(AppError::field("current_password", INCORRECT_CURRENT_PASSWORD));
        }

        self.change_password(user, &form.new_password).await
    }

    async fn register(&self, form: RegistrationForm) -> AppResult<User> {
        validate_form(&form)?;

        if self.repo.find_by_email(&form.email).await?.is_some() {
            return Err(AppError::conflict("Email"));
        }

        let mut user = form.to_user();
        let hash = self.hasher.hash(&user, &form.password)?;
        user.set_password_hash(hash);

        let saved = self.repo.save(user).await?;
        tracing::info!(user_id = ?saved.id, "User registered");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use common::OffsetPaginator;
    use domain::{Argon2Hasher, MockPasswordHasher};
    use mockall::Sequence;
    use sea_orm::DbErr;
    use uuid::Uuid;

    use crate::repository::MockUserRepository;

    fn persisted_user(email: &str) -> User {
        let mut user = User::new(email);
        user.id = Some(Uuid::new_v4());
        user.password_hash = Some("old-hash".to_string());
        user
    }

    fn service(repo: MockUserRepository, hasher: impl PasswordHasher + 'static) -> UserManager {
        UserManager::new(Arc::new(repo), Arc::new(hasher), Arc::new(OffsetPaginator))
    }

    #[tokio::test]
    async fn test_delete_transient_user_is_rejected() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().times(0);

        let service = service(repo, MockPasswordHasher::new());
        let result = service.delete(&User::new("new@example.com")).await;

        match result {
            Err(AppError::InvalidState(msg)) => assert_eq!(msg, CANNOT_DELETE_TRANSIENT_USER),
            other => panic!("expected invalid state, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_persisted_user_delegates_once() {
        let user = persisted_user("test@example.com");
        let id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_delete()
            .withf(move |u: &User| u.id == id)
            .times(1)
            .returning(|_| Ok(()));

        let service = service(repo, MockPasswordHasher::new());
        assert!(service.delete(&user).await.is_ok());
    }

    #[tokio::test]
    async fn test_change_password_hashes_and_saves_once() {
        let user = persisted_user("test@example.com");

        let mut repo = MockUserRepository::new();
        repo.expect_save().times(1).returning(Ok);

        let service = service(repo, Argon2Hasher::new());
        let saved = service.change_password(&user, "newpass123").await.unwrap();

        let hash = saved.password_hash.clone().expect("hash assigned");
        assert_ne!(Some(hash.as_str()), user.password_hash.as_deref());
        assert_ne!(hash, "newpass123");
        assert_eq!(saved.id, user.id);
        assert!(Argon2Hasher::new().verify(&saved, "newpass123"));
    }

    #[tokio::test]
    async fn test_change_password_leaves_callers_user_untouched() {
        let user = persisted_user("test@example.com");
        let before = user.clone();

        let mut repo = MockUserRepository::new();
        repo.expect_save().times(1).returning(Ok);

        let service = service(repo, Argon2Hasher::new());
        let saved = service.change_password(&user, "newpass123").await.unwrap();

        assert_eq!(user.password_hash, before.password_hash);
        assert_eq!(user.updated_at, before.updated_at);
        assert_ne!(saved.password_hash, user.password_hash);
    }

    #[tokio::test]
    async fn test_update_password_rejects_wrong_current_password() {
        let user = persisted_user("test@example.com");

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().times(1).returning(|_, _| false);
        hasher.expect_hash().times(0);

        let mut repo = MockUserRepository::new();
        repo.expect_save().times(0);

        let service = service(repo, hasher);
        let form = ChangePasswordForm::new("wrong-password", "NewPassword1", "NewPassword1");
        let err = service.update_password(&user, form).await.unwrap_err();

        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(err.field_errors()[0].field, "current_password");
        assert_eq!(err.field_errors()[0].message, INCORRECT_CURRENT_PASSWORD);
        assert_eq!(user.password_hash.as_deref(), Some("old-hash"));
    }

    #[tokio::test]
    async fn test_update_password_verifies_before_changing() {
        let user = persisted_user("test@example.com");
        let mut seq = Sequence::new();

        let mut hasher = MockPasswordHasher::new();
        let mut repo = MockUserRepository::new();

        hasher
            .expect_verify()
            .withf(|_, plaintext: &str| plaintext == "old-password")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| true);
        hasher
            .expect_hash()
            .withf(|_, plaintext: &str| plaintext == "NewPassword1")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("new-hash".to_string()));
        repo.expect_save()
            .withf(|u: &User| u.password_hash.as_deref() == Some("new-hash"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(Ok);

        let service = service(repo, hasher);
        let form = ChangePasswordForm::new("old-password", "NewPassword1", "NewPassword1");
        let saved = service.update_password(&user, form).await.unwrap();

        assert_eq!(saved.password_hash.as_deref(), Some("new-hash"));
    }

    #[tokio::test]
    async fn test_update_password_invalid_form_skips_verification() {
        let user = persisted_user("test@example.com");

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().times(0);

        let mut repo = MockUserRepository::new();
        repo.expect_save().times(0);

        let service = service(repo, hasher);
        let form = ChangePasswordForm::new("old-password", "NewPassword1", "Different1");
        let err = service.update_password(&user, form).await.unwrap_err();

        assert_eq!(err.code(), "FORM_ERROR");
        assert_eq!(err.field_errors()[0].field, "new_password_repeat");
    }

    #[tokio::test]
    async fn test_paginated_list_slices_pages() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_all().times(4).returning(|| {
            Ok((0..25)
                .map(|i| persisted_user(&format!("user{}@example.com", i)))
                .collect())
        });

        let service = service(repo, MockPasswordHasher::new());

        let first = service.get_paginated_list(1).await.unwrap();
        assert_eq!(first.data.len(), 10);
        assert_eq!(first.meta.total, 25);
        assert_eq!(first.meta.per_page, USERS_PER_PAGE);

        assert_eq!(service.get_paginated_list(2).await.unwrap().data.len(), 10);

        let last = service.get_paginated_list(3).await.unwrap();
        assert_eq!(last.data.len(), 5);
        assert_eq!(last.data[0].email, "user20@example.com");

        let past_end = service.get_paginated_list(4).await.unwrap();
        assert!(past_end.data.is_empty());
    }

    #[tokio::test]
    async fn test_paginated_list_rejects_page_zero() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_all().times(0);

        let service = service(repo, MockPasswordHasher::new());
        let result = service.get_paginated_list(0).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_hashes_before_saving() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .withf(|email: &str| email == "new@example.com")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_save()
            .withf(|u: &User| u.id.is_none() && u.password_hash.as_deref() == Some("hashed"))
            .times(1)
            .returning(|mut user| {
                user.id = Some(Uuid::new_v4());
                Ok(user)
            });

        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .withf(|_, plaintext: &str| plaintext == "Password123")
            .times(1)
            .returning(|_, _| Ok("hashed".to_string()));

        let service = service(repo, hasher);
        let form = RegistrationForm::new("new@example.com", "Password123", "Password123");
        let user = service.register(form).await.unwrap();

        assert!(user.is_persisted());
        assert_eq!(user.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(persisted_user(email))));
        repo.expect_save().times(0);

        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().times(0);

        let service = service(repo, hasher);
        let form = RegistrationForm::new("taken@example.com", "Password123", "Password123");
        let result = service.register(form).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_invalid_form() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(0);

        let service = service(repo, MockPasswordHasher::new());
        let form = RegistrationForm::new("not-an-email", "short", "other");
        let err = service.register(form).await.unwrap_err();

        assert_eq!(err.field_errors().len(), 3);
    }

    #[tokio::test]
    async fn test_get_user_by_email_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let service = service(repo, MockPasswordHasher::new());
        let result = service.get_user_by_email("missing@example.com").await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_save_propagates_storage_errors() {
        let mut repo = MockUserRepository::new();
        repo.expect_save()
            .times(1)
            .returning(|_| Err(AppError::Database(DbErr::RecordNotUpdated)));

        let service = service(repo, MockPasswordHasher::new());
        let result = service.save(persisted_user("test@example.com")).await;

        assert!(matches!(
            result,
            Err(AppError::Database(DbErr::RecordNotUpdated))
        ));
    }
}
