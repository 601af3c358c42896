use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Access tier of an account.
///
/// `SuperAdmin` is a superset of `Admin`: anything an admin may do, a
/// super-admin may do as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,

    #[serde(rename = "super-admin")]
    SuperAdmin,
}

/// Error for role parsing failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

impl Role {
    /// Wire representation used in tokens, storage and JSON bodies.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SuperAdmin => "super-admin",
        }
    }

    /// Lifetime of a token issued for this role.
    ///
    /// # Returns
    /// 48 hours for admins, 720 hours (30 days) for super-admins
    pub fn token_lifetime(&self) -> Duration {
        match self {
            Role::Admin => Duration::hours(48),
            Role::SuperAdmin => Duration::hours(720),
        }
    }

    pub fn is_super_admin(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "super-admin" => Ok(Role::SuperAdmin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("super-admin".parse::<Role>(), Ok(Role::SuperAdmin));
    }

    #[test]
    fn test_parse_unknown_role() {
        assert_eq!(
            "viewer".parse::<Role>(),
            Err(RoleError::Unknown("viewer".to_string()))
        );
        // Matching is exact
        assert!("Admin".parse::<Role>().is_err());
        assert!("superadmin".parse::<Role>().is_err());
    }

    #[test]
    fn test_token_lifetime() {
        assert_eq!(Role::Admin.token_lifetime(), Duration::hours(48));
        assert_eq!(Role::SuperAdmin.token_lifetime(), Duration::days(30));
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super-admin\"");

        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
