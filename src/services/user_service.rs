use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::PasswordHasher,
    errors::{AppError, AppResult},
    models::{
        domain::{user::normalize_email, User},
        dto::request::{LoginRequest, RegisterRequest},
    },
    repositories::UserRepository,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, hasher: PasswordHasher) -> Self {
        Self { repository, hasher }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        request.validate()?;

        let email = normalize_email(&request.email);
        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(AppError::ValidationError(
                "Email already registered.".to_string(),
            ));
        }

        let password_hash = self.hasher.hash(&request.password).await?;
        let user = User::new(request.username.trim(), &email, &password_hash);

        let created = self.repository.create(user).await.map_err(|e| match e {
            // Lost a race with a concurrent registration of the same email
            AppError::AlreadyExists(_) => {
                AppError::ValidationError("Email already registered.".to_string())
            }
            other => other,
        })?;

        log::info!("Registered user {}", created.id);
        Ok(created)
    }

    /// Returns the user when the credentials match. Unknown emails and wrong
    /// passwords are indistinguishable to the caller.
    pub async fn authenticate(&self, request: LoginRequest) -> AppResult<User> {
        request.validate()?;

        let email = normalize_email(&request.email);
        let user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::ValidationError(INVALID_CREDENTIALS.to_string()))?;

        let matches = self
            .hasher
            .verify(&request.password, &user.password_hash)
            .await
            .unwrap_or_else(|e| {
                log::warn!("Stored password hash for user {} is unusable: {}", user.id, e);
                false
            });

        if !matches {
            return Err(AppError::ValidationError(INVALID_CREDENTIALS.to_string()));
        }

        Ok(user)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.repository.health_check().await
    }
}
