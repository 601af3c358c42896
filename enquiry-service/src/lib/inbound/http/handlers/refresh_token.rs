use auth::TokenError;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::ErrorMessage;
use crate::inbound::http::middleware::AuthorizedUser;
use crate::inbound::http::router::AppState;

/// Re-issue the caller's bearer token with fresh time bounds.
///
/// The role is carried over from the presented token.
pub async fn refresh_token(
    State(state): State<AppState>,
    caller: AuthorizedUser,
) -> Result<ApiSuccess<RefreshTokenResponseData>, ApiError> {
    let issued = state.token_service.refresh(&caller.token).map_err(|e| {
        tracing::warn!(user_id = %caller.user_id, error = %e, "Token refresh failed");
        refresh_error(e)
    })?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "Token refreshed successfully",
        RefreshTokenResponseData {
            token: issued.token,
            expires_at: issued.expires_at,
            role: issued.claims.role,
        },
    ))
}

fn refresh_error(err: TokenError) -> ApiError {
    match err {
        TokenError::InvalidRole(_) => ApiError::Forbidden(ErrorMessage::new(
            "Insufficient permissions",
            err.to_string(),
        )),
        TokenError::SigningFailed(_) => ApiError::internal(err),
        TokenError::MalformedToken(_)
        | TokenError::UnexpectedSigningMethod(_)
        | TokenError::InvalidSignatureOrExpired => {
            ApiError::Unauthorized(ErrorMessage::new("Invalid token", err.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshTokenResponseData {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_error_statuses() {
        assert_eq!(
            refresh_error(TokenError::InvalidRole("viewer".into())).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            refresh_error(TokenError::InvalidSignatureOrExpired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            refresh_error(TokenError::SigningFailed("hmac".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
