//! Authorization gate for protected routes.
//!
//! Two stages run in a fixed order: [`authenticate`] turns the bearer token
//! into an [`AuthenticatedUser`], then [`authorize`] consumes it and checks
//! the role against a [`RolePolicy`]. Only an [`AuthorizedUser`] reaches the
//! request extensions, so a handler cannot observe a half-checked identity.

use auth::Role;
use auth::TokenService;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use thiserror::Error;

use super::handlers::ApiError;
use super::handlers::ErrorMessage;
use crate::inbound::http::router::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Gate failures, each mapped to one response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Authorization header missing")]
    MissingAuth,

    #[error("Invalid authorization format")]
    BadFormat,

    #[error("Invalid token")]
    InvalidOrExpired,

    #[error("Insufficient permissions")]
    InsufficientRole,

    #[error("User role not found in request context")]
    RoleMissing,
}

impl From<GateError> for ApiError {
    fn from(err: GateError) -> Self {
        let message = err.to_string();
        match err {
            GateError::MissingAuth => {
                ApiError::Unauthorized(ErrorMessage::new(message, "Bearer token is required"))
            }
            GateError::BadFormat => ApiError::Unauthorized(ErrorMessage::new(
                message,
                "Authorization header must be 'Bearer <token>'",
            )),
            GateError::InvalidOrExpired => {
                ApiError::Unauthorized(ErrorMessage::new(message, "Token is expired or invalid"))
            }
            GateError::InsufficientRole => ApiError::Forbidden(ErrorMessage::new(
                message,
                "Access denied: admin or super-admin role required",
            )),
            GateError::RoleMissing => ApiError::InternalServerError(ErrorMessage::new(
                message,
                "Authentication must run before role authorization",
            )),
        }
    }
}

/// Identity carried by a valid token, before any role check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub username: String,
    /// Role exactly as carried by the token; may be unrecognised.
    pub role: String,
    pub token: String,
}

/// Identity that passed a role check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedUser {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub token: String,
}

/// Which roles a route admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RolePolicy {
    /// The given role, or super-admin.
    AtLeast(Role),
    AdminOrSuperAdmin,
}

impl RolePolicy {
    pub fn permits(&self, role: Role) -> bool {
        match self {
            RolePolicy::AtLeast(required) => role == *required || role.is_super_admin(),
            RolePolicy::AdminOrSuperAdmin => matches!(role, Role::Admin | Role::SuperAdmin),
        }
    }
}

/// Validate the bearer token in `headers`.
///
/// # Errors
/// * `MissingAuth` - No Authorization header
/// * `BadFormat` - Header is not `Bearer <token>`
/// * `InvalidOrExpired` - Token rejected by the token service
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
) -> Result<AuthenticatedUser, GateError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(GateError::MissingAuth)?;

    let token = value
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(GateError::BadFormat)?;

    let claims = tokens.validate(token).map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        GateError::InvalidOrExpired
    })?;

    Ok(AuthenticatedUser {
        user_id: claims.user_id,
        email: claims.email,
        username: claims.username,
        role: claims.role,
        token: token.to_string(),
    })
}

/// Check an authenticated identity against a role policy.
///
/// # Errors
/// * `InsufficientRole` - Role is unrecognised or not admitted by `policy`
pub fn authorize(
    user: AuthenticatedUser,
    policy: RolePolicy,
) -> Result<AuthorizedUser, GateError> {
    let role = user
        .role
        .parse::<Role>()
        .ok()
        .filter(|role| policy.permits(*role))
        .ok_or_else(|| {
            tracing::warn!(
                user_id = %user.user_id,
                role = %user.role,
                "Role not permitted"
            );
            GateError::InsufficientRole
        })?;

    Ok(AuthorizedUser {
        user_id: user.user_id,
        email: user.email,
        username: user.username,
        role,
        token: user.token,
    })
}

/// Middleware admitting admins and super-admins.
///
/// `OPTIONS` requests pass through untouched so CORS preflight never needs
/// credentials.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    gate(&state, RolePolicy::AdminOrSuperAdmin, req, next).await
}

async fn gate(
    state: &AppState,
    policy: RolePolicy,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let authenticated = authenticate(req.headers(), &state.token_service)?;
    let authorized = authorize(authenticated, policy)?;

    tracing::debug!(
        user_id = %authorized.user_id,
        role = %authorized.role,
        "Request authorized"
    );

    req.extensions_mut().insert(authorized);

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthorizedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthorizedUser>()
            .cloned()
            .ok_or_else(|| GateError::RoleMissing.into())
    }
}

#[cfg(test)]
mod tests {
    use auth::Claims;
    use auth::JwtHandler;
    use auth::TokenSubject;
    use axum::body::Body;
    use axum::http::HeaderValue;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use chrono::Duration;
    use chrono::Utc;
    use tower::ServiceExt;

    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    fn tokens() -> TokenService {
        TokenService::new(SECRET, auth::DEFAULT_ISSUER)
    }

    fn token_for(role: Role) -> String {
        tokens()
            .issue(&TokenSubject {
                user_id: "9b2d6a4e-1111-4000-8000-000000000001".to_string(),
                email: "admin@example.com".to_string(),
                username: "admin".to_string(),
                role,
            })
            .unwrap()
            .token
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn authenticated(role: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "u1".to_string(),
            email: "u1@example.com".to_string(),
            username: "u1".to_string(),
            role: role.to_string(),
            token: "t".to_string(),
        }
    }

    #[test]
    fn test_authenticate_missing_header() {
        let result = authenticate(&HeaderMap::new(), &tokens());
        assert_eq!(result, Err(GateError::MissingAuth));
    }

    #[test]
    fn test_authenticate_wrong_scheme() {
        let result = authenticate(&headers_with("Basic YWRtaW46YWRtaW4="), &tokens());
        assert_eq!(result, Err(GateError::BadFormat));
    }

    #[test]
    fn test_authenticate_rejected_token() {
        let result = authenticate(&headers_with("Bearer not.a.token"), &tokens());
        assert_eq!(result, Err(GateError::InvalidOrExpired));
    }

    #[test]
    fn test_authenticate_valid_token() {
        let token = token_for(Role::Admin);
        let user = authenticate(&headers_with(&format!("Bearer {}", token)), &tokens()).unwrap();

        assert_eq!(user.role, "admin");
        assert_eq!(user.username, "admin");
        assert_eq!(user.token, token);
    }

    #[test]
    fn test_policy_at_least() {
        let admin_or_above = RolePolicy::AtLeast(Role::Admin);
        assert!(admin_or_above.permits(Role::Admin));
        assert!(admin_or_above.permits(Role::SuperAdmin));

        let super_only = RolePolicy::AtLeast(Role::SuperAdmin);
        assert!(!super_only.permits(Role::Admin));
        assert!(super_only.permits(Role::SuperAdmin));
    }

    #[test]
    fn test_authorize() {
        let authorized = authorize(authenticated("super-admin"), RolePolicy::AdminOrSuperAdmin);
        assert_eq!(authorized.unwrap().role, Role::SuperAdmin);

        assert_eq!(
            authorize(authenticated("viewer"), RolePolicy::AdminOrSuperAdmin),
            Err(GateError::InsufficientRole)
        );
        assert_eq!(
            authorize(authenticated("admin"), RolePolicy::AtLeast(Role::SuperAdmin)),
            Err(GateError::InsufficientRole)
        );
    }

    #[test]
    fn test_gate_error_statuses() {
        assert_eq!(
            ApiError::from(GateError::MissingAuth).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(GateError::InsufficientRole).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(GateError::RoleMissing).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_extractor_without_gate_is_role_missing() {
        async fn whoami(user: AuthorizedUser) -> String {
            user.username
        }

        let app = Router::new().route("/whoami", get(whoami));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/whoami")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unknown_role_token_authenticates_then_fails_authorization() {
        let now = Utc::now();
        let claims = Claims::new(
            "u2",
            "viewer@example.com",
            "viewer",
            "viewer",
            auth::DEFAULT_ISSUER,
            now,
            Duration::hours(1),
        );
        let token = JwtHandler::new(SECRET).encode(&claims).unwrap();

        let user = authenticate(&headers_with(&format!("Bearer {}", token)), &tokens()).unwrap();
        assert_eq!(user.role, "viewer");
        assert_eq!(
            authorize(user, RolePolicy::AdminOrSuperAdmin),
            Err(GateError::InsufficientRole)
        );
    }
}
