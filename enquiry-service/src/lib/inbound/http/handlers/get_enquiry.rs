use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;

use super::list_enquiries::EnquiryData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::enquiry::models::EnquiryId;
use crate::domain::enquiry::ports::EnquiryServicePort;
use crate::enquiry::errors::EnquiryError;
use crate::inbound::http::middleware::AuthorizedUser;
use crate::inbound::http::router::AppState;

/// A malformed id is reported exactly like a missing enquiry.
pub async fn get_enquiry(
    State(state): State<AppState>,
    _caller: AuthorizedUser,
    Path(enquiry_id): Path<String>,
) -> Result<ApiSuccess<EnquiryData>, ApiError> {
    let enquiry_id = EnquiryId::from_string(&enquiry_id).map_err(EnquiryError::from)?;

    state
        .enquiry_service
        .get_enquiry(&enquiry_id)
        .await
        .map_err(ApiError::from)
        .map(|ref enquiry| {
            ApiSuccess::new(
                StatusCode::OK,
                "Enquiry retrieved successfully",
                enquiry.into(),
            )
        })
}
