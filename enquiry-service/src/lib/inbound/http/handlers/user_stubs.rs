//! Per-user routes that are reserved but not served.
//!
//! They sit behind the gate like every other protected route, so an
//! unauthenticated caller still gets 401 before learning anything.

use super::ApiError;
use super::ErrorMessage;
use crate::inbound::http::middleware::AuthorizedUser;

fn not_implemented(method: &str) -> ApiError {
    ApiError::MethodNotAllowed(ErrorMessage::new(
        "Method not allowed",
        format!("{} method not implemented for this endpoint", method),
    ))
}

pub async fn get_user(_caller: AuthorizedUser) -> ApiError {
    not_implemented("GET")
}

pub async fn update_user(_caller: AuthorizedUser) -> ApiError {
    not_implemented("PUT")
}

pub async fn delete_user(_caller: AuthorizedUser) -> ApiError {
    not_implemented("DELETE")
}
