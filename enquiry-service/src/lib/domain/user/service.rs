use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    /// First candidate username for `email` that no stored user holds.
    ///
    /// Two concurrent creations may both see the same candidate as free;
    /// the store's unique constraint rejects the second insert.
    async fn available_username(&self, email: &EmailAddress) -> Result<Username, UserError> {
        let base = username::derive_username(email.as_str());

        for candidate in username::candidates(&base) {
            let candidate = Username::new(candidate)?;
            if self.repository.find_by_username(&candidate).await?.is_none() {
                return Ok(candidate);
            }
            tracing::debug!(username = %candidate, "Username taken, trying next candidate");
        }

        Err(UserError::UsernameUnavailable(base))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        if self.repository.find_by_email(&command.email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let username = self.available_username(&command.email).await?;
        let password_hash = self.password_hasher.hash(&command.password)?;
        let now = Utc::now();

        let user = User {
            id: UserId::new(),
            username,
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            password_hash,
            role: command.role,
            is_active: true,
            profile_pic: command.profile_pic,
            company_name: command.company_name,
            created_at: now,
            updated_at: now,
            last_login: None,
        };

        let created_user = self.repository.create(user).await?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            role = %created_user.role,
            "User created"
        );

        Ok(created_user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let not_found = || UserError::NotFoundByEmail(email.to_string());

        // Anything that is not a valid address cannot be stored either
        let email_address = EmailAddress::new(email.to_string()).map_err(|_| not_found())?;

        let mut user = self
            .repository
            .find_by_email(&email_address)
            .await?
            .ok_or_else(not_found)?;

        if !user.is_active {
            return Err(UserError::AccountDeactivated);
        }

        if !self.password_hasher.verify(password, &user.password_hash)? {
            return Err(UserError::InvalidPassword);
        }

        let now = Utc::now();
        match self.repository.record_login(&user.id, now).await {
            Ok(()) => user.last_login = Some(now),
            Err(e) => tracing::warn!(
                user_id = %user.id,
                error = %e,
                "Failed to record last login"
            ),
        }

        Ok(user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(first_name) = command.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = command.last_name {
            user.last_name = last_name;
        }
        if let Some(profile_pic) = command.profile_pic {
            user.profile_pic = Some(profile_pic);
        }
        if let Some(company_name) = command.company_name {
            user.company_name = Some(company_name);
        }
        if let Some(role) = command.role {
            user.role = role;
        }
        if let Some(is_active) = command.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();

        self.repository.update(user).await
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        self.repository.delete(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
