use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::role::Role;
use crate::role::RoleError;

/// Role-scoped JWT claims.
///
/// Standard RFC 7519 registered claims plus the identity fields the gate
/// needs downstream. `role` is kept as the raw string carried by the token
/// so that a token minted for a role this service does not know can still be
/// decoded and then rejected by authorization rather than by parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    pub user_id: String,
    pub email: String,
    pub username: String,
    pub role: String,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build claims for an identity at a given instant.
    ///
    /// # Arguments
    /// * `user_id` - Unique user identifier (also used as `sub`)
    /// * `email` - Account email
    /// * `username` - Account username
    /// * `role` - Role carried by the token
    /// * `issuer` - Service identifier
    /// * `issued_at` - Instant used for `iat` and `nbf`
    /// * `lifetime` - Duration added to `issued_at` for `exp`
    pub fn new(
        user_id: impl ToString,
        email: impl ToString,
        username: impl ToString,
        role: impl ToString,
        issuer: impl ToString,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        let user_id = user_id.to_string();
        let issued = issued_at.timestamp();

        Self {
            sub: user_id.clone(),
            user_id,
            email: email.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            iss: issuer.to_string(),
            iat: issued,
            nbf: issued,
            exp: (issued_at + lifetime).timestamp(),
        }
    }

    /// Parse the carried role.
    ///
    /// # Errors
    /// * `Unknown` - Role string is not one this service recognises
    pub fn role(&self) -> Result<Role, RoleError> {
        self.role.parse()
    }
}
