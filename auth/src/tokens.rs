use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use thiserror::Error;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::role::Role;

/// Issuer written into every token unless configured otherwise.
pub const DEFAULT_ISSUER: &str = "enquiry-service";

/// Lifetime reported for role strings this service does not recognise.
const FALLBACK_LIFETIME_HOURS: i64 = 24;

/// Token service errors.
///
/// Signature mismatch and time-bound violations share one variant: callers
/// cannot tell a forged token from a stale one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is malformed: {0}")]
    MalformedToken(String),

    #[error("Unexpected signing method: {0}")]
    UnexpectedSigningMethod(String),

    #[error("Token signature is invalid or token is expired")]
    InvalidSignatureOrExpired,

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Failed to sign token: {0}")]
    SigningFailed(String),
}

impl From<JwtError> for TokenError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Malformed(msg) => TokenError::MalformedToken(msg),
            JwtError::UnexpectedAlgorithm(msg) => TokenError::UnexpectedSigningMethod(msg),
            JwtError::EncodingFailed(msg) => TokenError::SigningFailed(msg),
            JwtError::InvalidSignature
            | JwtError::TokenExpired
            | JwtError::NotYetValid
            | JwtError::InvalidToken(_) => TokenError::InvalidSignatureOrExpired,
        }
    }
}

/// Identity a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSubject {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub role: Role,
}

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
    pub expires_at: DateTime<Utc>,
}

/// Issues, validates and refreshes role-scoped bearer tokens.
///
/// Stateless apart from the signing secret, which is read-only after
/// construction, so a single instance is shared across requests.
pub struct TokenService {
    jwt_handler: JwtHandler,
    issuer: String,
}

impl TokenService {
    /// Create a token service.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing secret
    /// * `issuer` - Service identifier written into `iss`
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            jwt_handler: JwtHandler::new(secret),
            issuer: issuer.into(),
        }
    }

    /// Issue a token for `subject`, valid from now for the role's lifetime.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn issue(&self, subject: &TokenSubject) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// `iat` and `nbf` are set to `now`; `exp` is `now` plus the role's
    /// token lifetime.
    pub fn issue_at(
        &self,
        subject: &TokenSubject,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let lifetime = subject.role.token_lifetime();
        let claims = Claims::new(
            &subject.user_id,
            &subject.email,
            &subject.username,
            subject.role,
            &self.issuer,
            now,
            lifetime,
        );

        let token = self.jwt_handler.encode(&claims)?;

        tracing::debug!(
            user_id = %subject.user_id,
            role = %subject.role,
            lifetime_hours = lifetime.num_hours(),
            "Token issued"
        );

        Ok(IssuedToken {
            token,
            expires_at: now + lifetime,
            claims,
        })
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `MalformedToken` - Token cannot be parsed
    /// * `UnexpectedSigningMethod` - Header algorithm is not HMAC
    /// * `InvalidSignatureOrExpired` - Bad signature, expired, or not yet valid
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.jwt_handler
            .decode::<Claims>(token)
            .map_err(TokenError::from)
    }

    /// Re-issue a valid token with fresh time bounds.
    ///
    /// The role comes from the presented token, not from the account store,
    /// so a role change made after the original issuance is not reflected.
    ///
    /// # Errors
    /// * Any `validate` error for the presented token
    /// * `InvalidRole` - Token carries a role this service does not recognise
    pub fn refresh(&self, token: &str) -> Result<IssuedToken, TokenError> {
        let claims = self.validate(token)?;

        let role = claims
            .role()
            .map_err(|_| TokenError::InvalidRole(claims.role.clone()))?;

        let subject = TokenSubject {
            user_id: claims.user_id,
            email: claims.email,
            username: claims.username,
            role,
        };

        self.issue(&subject)
    }

    /// Token lifetime for a role string.
    ///
    /// Display helper only: unrecognised roles report a 24 hour lifetime,
    /// whereas issuing for them is impossible.
    pub fn expiration_for(role: &str) -> Duration {
        role.parse::<Role>()
            .map(|role| role.token_lifetime())
            .unwrap_or_else(|_| Duration::hours(FALLBACK_LIFETIME_HOURS))
    }
}
