use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::enquiry::errors::EnquiryError;
use crate::enquiry::errors::EnquiryValidationError;
use crate::user::errors::UserError;

pub mod create_user;
pub mod get_enquiry;
pub mod list_enquiries;
pub mod list_users;
pub mod refresh_token;
pub mod root;
pub mod sign_in;
pub mod submit_enquiry;
pub mod user_stubs;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, message, data)))
    }

    pub fn status(&self) -> StatusCode {
        self.0
    }

    pub fn data(&self) -> &T {
        &self.1 .0.data
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Human-facing error summary plus optional technical detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub message: String,
    pub detail: Option<String>,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: Some(detail.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(ErrorMessage),
    Unauthorized(ErrorMessage),
    Forbidden(ErrorMessage),
    NotFound(ErrorMessage),
    MethodNotAllowed(ErrorMessage),
    Conflict(ErrorMessage),
    UnsupportedMediaType(ErrorMessage),
    InternalServerError(ErrorMessage),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &ErrorMessage {
        match self {
            ApiError::BadRequest(message)
            | ApiError::Unauthorized(message)
            | ApiError::Forbidden(message)
            | ApiError::NotFound(message)
            | ApiError::MethodNotAllowed(message)
            | ApiError::Conflict(message)
            | ApiError::UnsupportedMediaType(message)
            | ApiError::InternalServerError(message) => message,
        }
    }

    pub fn internal(detail: impl ToString) -> Self {
        ApiError::InternalServerError(ErrorMessage::new(
            "Internal server error",
            detail.to_string(),
        ))
    }

    pub fn missing_fields(fields: &str) -> Self {
        ApiError::BadRequest(ErrorMessage::new(
            "Missing required fields",
            format!("{} are required", fields),
        ))
    }

    pub fn invalid_email(detail: impl Into<String>) -> Self {
        ApiError::BadRequest(ErrorMessage::new("Invalid email format", detail))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = ?self, "Request failed");
        }

        let ErrorMessage { message, detail } = match self {
            ApiError::BadRequest(message)
            | ApiError::Unauthorized(message)
            | ApiError::Forbidden(message)
            | ApiError::NotFound(message)
            | ApiError::MethodNotAllowed(message)
            | ApiError::Conflict(message)
            | ApiError::UnsupportedMediaType(message)
            | ApiError::InternalServerError(message) => message,
        };

        (status, Json(ApiErrorBody::new(status, message, detail))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => {
                ApiError::NotFound(ErrorMessage::new("User not found", err.to_string()))
            }
            UserError::NotFoundByEmail(_) => ApiError::Unauthorized(ErrorMessage::new(
                "Email not found",
                "No user exists with this email address",
            )),
            UserError::InvalidPassword => ApiError::Unauthorized(ErrorMessage::new(
                "Wrong password",
                "The password you entered is incorrect",
            )),
            UserError::AccountDeactivated => ApiError::Forbidden(ErrorMessage::new(
                "Account deactivated",
                "Your account has been deactivated. Please contact support",
            )),
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(ErrorMessage::new(
                "User already exists",
                "Email address is already registered",
            )),
            UserError::UsernameAlreadyExists(_) | UserError::UsernameUnavailable(_) => {
                ApiError::Conflict(ErrorMessage::new("User already exists", err.to_string()))
            }
            UserError::InvalidEmail(_) => ApiError::invalid_email(err.to_string()),
            UserError::InvalidUsername(_) | UserError::InvalidUserId(_) => {
                ApiError::BadRequest(ErrorMessage::new("Invalid request", err.to_string()))
            }
            UserError::Password(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::internal(err)
            }
        }
    }
}

impl From<EnquiryError> for ApiError {
    fn from(err: EnquiryError) -> Self {
        match err {
            EnquiryError::NotFound(_) | EnquiryError::InvalidId(_) => {
                ApiError::NotFound(ErrorMessage::new(
                    "Enquiry not found",
                    "No enquiry found with the provided ID",
                ))
            }
            EnquiryError::Validation(ref validation) => {
                let message = match validation {
                    EnquiryValidationError::MissingRequiredFields => "Missing required fields",
                    EnquiryValidationError::EmailTooLong
                    | EnquiryValidationError::EmailMissingDomain => "Invalid email format",
                };
                ApiError::BadRequest(ErrorMessage::new(message, validation.to_string()))
            }
            EnquiryError::DatabaseError(_) | EnquiryError::Unknown(_) => ApiError::internal(err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::UnsupportedMediaType(ErrorMessage::new(
                    "Unsupported media type",
                    "Content-Type must be application/json",
                ))
            }
            other => {
                ApiError::BadRequest(ErrorMessage::new("Invalid JSON format", other.body_text()))
            }
        }
    }
}

/// JSON body extractor whose rejections use the response envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    status: &'static str,
    message: String,
    data: T,
    timestamp: String,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            status: "success",
            message: message.into(),
            data,
            timestamp: now_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    status_code: u16,
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    timestamp: String,
}

impl ApiErrorBody {
    pub fn new(status_code: StatusCode, message: String, error: Option<String>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            status: "error",
            message,
            error,
            timestamp: now_rfc3339(),
        }
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enquiry::errors::EnquiryIdError;

    #[test]
    fn test_user_error_mapping() {
        assert_eq!(
            ApiError::from(UserError::NotFoundByEmail("a@b.com".into())).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(UserError::InvalidPassword).message().message,
            "Wrong password"
        );
        assert_eq!(
            ApiError::from(UserError::AccountDeactivated).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(UserError::EmailAlreadyExists("a@b.com".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(UserError::DatabaseError("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_enquiry_error_mapping() {
        let malformed = EnquiryError::InvalidId(EnquiryIdError::InvalidFormat("x".into()));
        assert_eq!(ApiError::from(malformed).status(), StatusCode::NOT_FOUND);

        let invalid = ApiError::from(EnquiryError::Validation(
            EnquiryValidationError::EmailMissingDomain,
        ));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message().message, "Invalid email format");
    }

    #[test]
    fn test_error_body_omits_missing_detail() {
        let body = ApiErrorBody::new(StatusCode::NOT_FOUND, "Endpoint not found".into(), None);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["status_code"], 404);
        assert_eq!(json["status"], "error");
        assert!(json.get("error").is_none());
        assert!(chrono::DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_success_body_shape() {
        let success = ApiSuccess::new(StatusCode::CREATED, "Created", 42);
        assert_eq!(success.status(), StatusCode::CREATED);
        assert_eq!(*success.data(), 42);

        let body = ApiResponseBody::new(StatusCode::OK, "Fine", vec![1, 2]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Fine");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }
}
