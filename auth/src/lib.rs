//! Authentication utilities library
//!
//! Provides the credential and token primitives used by the enquiry service:
//! - Password hashing (Argon2id)
//! - Account roles and their token lifetimes
//! - Role-scoped JWT issuance, validation and refresh
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Role, TokenService, TokenSubject, DEFAULT_ISSUER};
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", DEFAULT_ISSUER);
//! let subject = TokenSubject {
//!     user_id: "user123".to_string(),
//!     email: "alice@example.com".to_string(),
//!     username: "alice".to_string(),
//!     role: Role::Admin,
//! };
//!
//! let issued = tokens.issue(&subject).unwrap();
//! let claims = tokens.validate(&issued.token).unwrap();
//! assert_eq!(claims.role().unwrap(), Role::Admin);
//! ```

pub mod jwt;
pub mod password;
pub mod role;
pub mod tokens;

pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use role::Role;
pub use role::RoleError;
pub use tokens::IssuedToken;
pub use tokens::TokenError;
pub use tokens::TokenService;
pub use tokens::TokenSubject;
pub use tokens::DEFAULT_ISSUER;
