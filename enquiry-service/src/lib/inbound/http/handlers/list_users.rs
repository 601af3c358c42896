use auth::Role;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::middleware::AuthorizedUser;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    _caller: AuthorizedUser,
) -> Result<ApiSuccess<Vec<UserListItem>>, ApiError> {
    state
        .user_service
        .list_users()
        .await
        .map_err(ApiError::from)
        .map(|users| {
            ApiSuccess::new(
                StatusCode::OK,
                "Users retrieved successfully",
                users.iter().map(UserListItem::from).collect(),
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListItem {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_pic: Option<String>,
    pub username: String,
    pub role: Role,
}

impl From<&User> for UserListItem {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.as_str().to_string(),
            profile_pic: user.profile_pic.clone(),
            username: user.username.as_str().to_string(),
            role: user.role,
        }
    }
}
