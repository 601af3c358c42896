use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiJson;
use super::ApiSuccess;
use crate::domain::enquiry::models::Enquiry;
use crate::domain::enquiry::models::NewEnquiry;
use crate::domain::enquiry::ports::EnquiryServicePort;
use crate::enquiry::errors::EnquiryValidationError;
use crate::inbound::http::router::AppState;

pub async fn submit_enquiry(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SubmitEnquiryRequest>,
) -> Result<ApiSuccess<SubmitEnquiryResponseData>, ApiError> {
    state
        .enquiry_service
        .submit_enquiry(body.try_into_submission()?)
        .await
        .map_err(ApiError::from)
        .map(|ref enquiry| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "Enquiry submitted successfully. We will get back to you soon.",
                enquiry.into(),
            )
        })
}

/// HTTP request body for an enquiry (raw JSON). Absent fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubmitEnquiryRequest {
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    company_name: String,
    enquiry_type: String,
    message: String,
}

impl SubmitEnquiryRequest {
    fn try_into_submission(self) -> Result<NewEnquiry, ApiError> {
        NewEnquiry::new(
            self.first_name.trim().to_string(),
            self.last_name.trim().to_string(),
            self.email.trim().to_string(),
            self.phone_number.trim().to_string(),
            self.company_name.trim().to_string(),
            self.enquiry_type.trim().to_string(),
            self.message.trim().to_string(),
        )
        .map_err(|err| match err {
            EnquiryValidationError::MissingRequiredFields => {
                ApiError::missing_fields("first_name, last_name, email, and message")
            }
            EnquiryValidationError::EmailTooLong | EnquiryValidationError::EmailMissingDomain => {
                ApiError::invalid_email(err.to_string())
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitEnquiryResponseData {
    pub enquiry_id: String,
    pub submitted_at: DateTime<Utc>,
}

impl From<&Enquiry> for SubmitEnquiryResponseData {
    fn from(enquiry: &Enquiry) -> Self {
        Self {
            enquiry_id: enquiry.id.to_string(),
            submitted_at: enquiry.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SubmitEnquiryRequest {
        SubmitEnquiryRequest {
            first_name: "Jane".to_string(),
            last_name: "Roe".to_string(),
            email: "jane@example.com".to_string(),
            message: "Please call me".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_optional_fields_may_be_absent() {
        let body: SubmitEnquiryRequest = serde_json::from_value(serde_json::json!({
            "first_name": "Jane",
            "last_name": "Roe",
            "email": "jane@example.com",
            "message": "Please call me"
        }))
        .unwrap();

        let submission = body.try_into_submission().unwrap();
        assert_eq!(submission.email(), "jane@example.com");
        assert_eq!(submission.enquiry_type(), "");
    }

    #[test]
    fn test_whitespace_only_message_is_missing() {
        let body = SubmitEnquiryRequest {
            message: "   ".to_string(),
            ..request()
        };

        let err = body.try_into_submission().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message().message, "Missing required fields");
    }

    #[test]
    fn test_email_without_domain() {
        let body = SubmitEnquiryRequest {
            email: "jane@localhost".to_string(),
            ..request()
        };

        let err = body.try_into_submission().unwrap_err();
        assert_eq!(err.message().message, "Invalid email format");
    }
}
