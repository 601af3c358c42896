use auth::Role;
use auth::TokenSubject;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::create_user::UserData;
use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use super::ErrorMessage;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

const SIGN_IN_SUCCESSFUL: &str = "Sign-in successful";

/// Sign in by email and password.
///
/// Unknown email, wrong password and a deactivated account each get their
/// own response.
pub async fn sign_in(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignInRequest>,
) -> Result<ApiSuccess<SignInResponseData>, ApiError> {
    let (email, password) = body.validate()?;

    let user = state
        .user_service
        .authenticate(&email, &password)
        .await
        .map_err(ApiError::from)?;

    signed_in(&state, &user)
}

/// Legacy login. Succeeds exactly like [`sign_in`] but collapses every
/// credential failure into one generic 401.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SignInRequest>,
) -> Result<ApiSuccess<SignInResponseData>, ApiError> {
    let (email, password) = body.validate()?;

    let user = state
        .user_service
        .authenticate(&email, &password)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByEmail(_)
            | UserError::InvalidPassword
            | UserError::AccountDeactivated => ApiError::Unauthorized(ErrorMessage::new(
                "Invalid credentials",
                "Email or password is incorrect",
            )),
            _ => ApiError::from(e),
        })?;

    signed_in(&state, &user)
}

fn signed_in(state: &AppState, user: &User) -> Result<ApiSuccess<SignInResponseData>, ApiError> {
    let issued = state
        .token_service
        .issue(&TokenSubject {
            user_id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            username: user.username.as_str().to_string(),
            role: user.role,
        })
        .map_err(ApiError::internal)?;

    tracing::info!(user_id = %user.id, role = %user.role, "User signed in");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        SIGN_IN_SUCCESSFUL,
        SignInResponseData {
            user: user.into(),
            message: SIGN_IN_SUCCESSFUL.to_string(),
            login_time: user.last_login.unwrap_or_else(Utc::now),
            token: issued.token,
            expires_at: issued.expires_at,
            role: user.role,
        },
    ))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SignInRequest {
    email: String,
    password: String,
}

impl SignInRequest {
    fn validate(self) -> Result<(String, String), ApiError> {
        let email = self.email.trim().to_string();

        if email.is_empty() || self.password.is_empty() {
            return Err(ApiError::missing_fields("email and password"));
        }
        if !email.contains('@') || !email.contains('.') {
            return Err(ApiError::invalid_email("Email must contain @ and domain"));
        }

        Ok((email, self.password))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInResponseData {
    pub user: UserData,
    pub message: String,
    pub login_time: DateTime<Utc>,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_email() {
        let request = SignInRequest {
            email: "  admin@example.com ".to_string(),
            password: "secret-pass".to_string(),
        };

        let (email, password) = request.validate().unwrap();
        assert_eq!(email, "admin@example.com");
        assert_eq!(password, "secret-pass");
    }

    #[test]
    fn test_validate_missing_password() {
        let request = SignInRequest {
            email: "admin@example.com".to_string(),
            password: String::new(),
        };

        let err = request.validate().unwrap_err();
        assert_eq!(
            err.message().detail.as_deref(),
            Some("email and password are required")
        );
    }

    #[test]
    fn test_validate_email_shape() {
        let request = SignInRequest {
            email: "admin".to_string(),
            password: "secret-pass".to_string(),
        };

        assert_eq!(
            request.validate().unwrap_err().message().message,
            "Invalid email format"
        );
    }
}
