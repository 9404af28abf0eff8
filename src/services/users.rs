use crate::{
    auth::{hash_password, verify_password},
    db::DbPool,
    entities::user,
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use slog::Logger;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({"email": "Autogarage@system.com", "password": "password123"}))]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
}

/// Public view of a user; never carries the hash
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<user::Model> for UserProfile {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct UserService {
    db_pool: Arc<DbPool>,
    logger: Logger,
}

impl UserService {
    pub fn new(db_pool: Arc<DbPool>, logger: Logger) -> Self {
        Self { db_pool, logger }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError> {
        user::Entity::find()
            .filter(user::Column::Email.eq(normalize_email(email)))
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Creates the login if no user owns `email` yet. Returns whether a user
    /// was created.
    #[instrument(skip(self, password))]
    pub async fn ensure_default_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<bool, ServiceError> {
        if self.find_by_email(email).await?.is_some() {
            return Ok(false);
        }

        user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(normalize_email(email)),
            password_hash: Set(hash_password(password)?),
            name: Set(Some("Administrator".to_string())),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.db_pool)
        .await
        .map_err(ServiceError::db_error)?;

        slog::info!(self.logger, "default user seeded"; "email" => email);
        Ok(true)
    }

    /// Wrong email and wrong password fail identically.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn authenticate(&self, request: &LoginRequest) -> Result<user::Model, ServiceError> {
        request.validate()?;
        let user = self
            .find_by_email(&request.email)
            .await?
            .filter(|u| verify_password(&request.password, &u.password_hash))
            .ok_or_else(|| ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;
        slog::debug!(self.logger, "login succeeded"; "user_id" => %user.id);
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<user::Model, ServiceError> {
        user::Entity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("User", id))
    }

    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<user::Model, ServiceError> {
        request.validate()?;
        if request.name.is_none() && request.password.is_none() {
            return Err(ServiceError::InvalidInput(
                "Nothing to update; send name and/or password".to_string(),
            ));
        }

        let mut active: user::ActiveModel = self.get(id).await?.into();
        if let Some(name) = request.name {
            active.name = Set(Some(name.trim().to_string()));
        }
        if let Some(password) = request.password.as_deref() {
            active.password_hash = Set(hash_password(password)?);
        }

        let model = active
            .update(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        slog::info!(self.logger, "profile updated"; "user_id" => %id);
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_connection, run_migrations};
    use crate::logging::discard_logger;
    use assert_matches::assert_matches;

    async fn service() -> UserService {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        run_migrations(&db).await.unwrap();
        UserService::new(Arc::new(db), discard_logger())
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn seeding_is_idempotent_and_case_insensitive() {
        let svc = service().await;
        assert!(svc
            .ensure_default_user("Autogarage@system.com", "password123")
            .await
            .unwrap());
        assert!(!svc
            .ensure_default_user("autogarage@SYSTEM.com", "other-pass")
            .await
            .unwrap());

        let user = svc
            .authenticate(&login("Autogarage@system.com", "password123"))
            .await
            .unwrap();
        assert_eq!(user.email, "autogarage@system.com");
    }

    #[tokio::test]
    async fn bad_credentials_share_one_message() {
        let svc = service().await;
        svc.ensure_default_user("a@b.com", "secret1").await.unwrap();

        let wrong_password = svc.authenticate(&login("a@b.com", "nope")).await;
        let wrong_email = svc.authenticate(&login("x@b.com", "secret1")).await;
        assert_matches!(wrong_password, Err(ServiceError::Unauthorized(m)) if m == INVALID_CREDENTIALS);
        assert_matches!(wrong_email, Err(ServiceError::Unauthorized(m)) if m == INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn password_change_takes_effect() {
        let svc = service().await;
        svc.ensure_default_user("a@b.com", "secret1").await.unwrap();
        let user = svc.authenticate(&login("a@b.com", "secret1")).await.unwrap();

        let short = svc
            .update_profile(
                user.id,
                UpdateProfileRequest {
                    password: Some("123".into()),
                    ..Default::default()
                },
            )
            .await;
        assert_matches!(short, Err(ServiceError::ValidationError { .. }));

        svc.update_profile(
            user.id,
            UpdateProfileRequest {
                name: Some("Owner".into()),
                password: Some("newsecret".into()),
            },
        )
        .await
        .unwrap();

        assert!(svc.authenticate(&login("a@b.com", "secret1")).await.is_err());
        let user = svc.authenticate(&login("a@b.com", "newsecret")).await.unwrap();
        assert_eq!(user.name.as_deref(), Some("Owner"));
    }
}
