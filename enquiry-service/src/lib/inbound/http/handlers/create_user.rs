use auth::Role;
use auth::RoleError;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::ErrorMessage;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;

const MIN_PASSWORD_LENGTH: usize = 8;

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .create_user(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "User created successfully",
                user.into(),
            )
        })
}

/// HTTP request body for provisioning an account (raw JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    role: String,
    profile_pic: Option<String>,
    company_name: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateUserRequestError {
    #[error("first_name, last_name, email, and password")]
    MissingFields,

    #[error("{0}")]
    Email(#[from] EmailError),

    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,

    #[error("Role must be either 'admin' or 'super-admin'")]
    Role(#[from] RoleError),
}

impl CreateUserRequest {
    /// Checks run in a fixed order: required fields, email shape, password
    /// length, role, then full email parsing.
    fn try_into_command(self) -> Result<CreateUserCommand, ParseCreateUserRequestError> {
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        let email = self.email.trim().to_string();

        if first_name.is_empty()
            || last_name.is_empty()
            || email.is_empty()
            || self.password.is_empty()
        {
            return Err(ParseCreateUserRequestError::MissingFields);
        }
        if !email.contains('@') || !email.contains('.') {
            return Err(EmailError::MissingDomain.into());
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ParseCreateUserRequestError::PasswordTooShort);
        }
        let role = self.role.trim().parse::<Role>()?;
        let email = EmailAddress::new(email)?;

        Ok(
            CreateUserCommand::new(first_name, last_name, email, self.password, role)
                .with_profile_pic(non_empty(self.profile_pic))
                .with_company_name(non_empty(self.company_name)),
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl From<ParseCreateUserRequestError> for ApiError {
    fn from(err: ParseCreateUserRequestError) -> Self {
        match err {
            ParseCreateUserRequestError::MissingFields => {
                ApiError::missing_fields(&err.to_string())
            }
            ParseCreateUserRequestError::Email(_) => ApiError::invalid_email(err.to_string()),
            ParseCreateUserRequestError::PasswordTooShort => {
                ApiError::BadRequest(ErrorMessage::new("Password too short", err.to_string()))
            }
            ParseCreateUserRequestError::Role(_) => {
                ApiError::BadRequest(ErrorMessage::new("Invalid role", err.to_string()))
            }
        }
    }
}

/// Public view of an account. The password hash never leaves the domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub profile_pic: Option<String>,
    pub company_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.as_str().to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.as_str().to_string(),
            role: user.role,
            is_active: user.is_active,
            profile_pic: user.profile_pic.clone(),
            company_name: user.company_name.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            last_login: user.last_login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            password: "correct-horse".to_string(),
            role: "admin".to_string(),
            profile_pic: Some("  ".to_string()),
            company_name: Some("Acme".to_string()),
        }
    }

    fn rejection(request: CreateUserRequest) -> ApiError {
        ApiError::from(request.try_into_command().unwrap_err())
    }

    #[test]
    fn test_valid_request() {
        let command = request().try_into_command().unwrap();

        assert_eq!(command.email.as_str(), "john.doe@example.com");
        assert_eq!(command.role, Role::Admin);
        assert_eq!(command.profile_pic, None);
        assert_eq!(command.company_name.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_missing_fields_checked_first() {
        let err = rejection(CreateUserRequest {
            first_name: String::new(),
            password: "short".to_string(),
            role: "viewer".to_string(),
            ..request()
        });

        assert_eq!(err.message().message, "Missing required fields");
        assert_eq!(
            err.message().detail.as_deref(),
            Some("first_name, last_name, email, and password are required")
        );
    }

    #[test]
    fn test_email_without_domain() {
        let err = rejection(CreateUserRequest {
            email: "john@localhost".to_string(),
            ..request()
        });
        assert_eq!(err.message().message, "Invalid email format");
    }

    #[test]
    fn test_short_password() {
        let err = rejection(CreateUserRequest {
            password: "1234567".to_string(),
            ..request()
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message().message, "Password too short");
    }

    #[test]
    fn test_unknown_role() {
        let err = rejection(CreateUserRequest {
            role: "viewer".to_string(),
            ..request()
        });
        assert_eq!(err.message().message, "Invalid role");
    }

    #[test]
    fn test_user_data_has_no_password_hash() {
        let now = Utc::now();
        let user = User {
            id: crate::domain::user::models::UserId::new(),
            username: crate::domain::user::models::Username::new("johndoe".to_string()).unwrap(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: EmailAddress::new("john.doe@example.com".to_string()).unwrap(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::SuperAdmin,
            is_active: true,
            profile_pic: None,
            company_name: None,
            created_at: now,
            updated_at: now,
            last_login: None,
        };

        let json = serde_json::to_value(UserData::from(&user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "super-admin");
        assert_eq!(json["username"], "johndoe");
    }
}
