use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::enquiry::models::Enquiry;
use crate::domain::enquiry::ports::EnquiryServicePort;
use crate::domain::enquiry::query::EchoedFilters;
use crate::domain::enquiry::query::EnquiryPage;
use crate::domain::enquiry::query::EnquiryQuery;
use crate::domain::enquiry::query::Pagination;
use crate::inbound::http::middleware::AuthorizedUser;
use crate::inbound::http::router::AppState;

pub async fn list_enquiries(
    State(state): State<AppState>,
    caller: AuthorizedUser,
    Query(params): Query<ListEnquiriesParams>,
) -> Result<ApiSuccess<ListEnquiriesResponseData>, ApiError> {
    let query = params.into_query();

    tracing::debug!(
        user_id = %caller.user_id,
        page = query.page,
        limit = query.limit,
        "Listing enquiries"
    );

    state
        .enquiry_service
        .list_enquiries(query)
        .await
        .map_err(ApiError::from)
        .map(|page| {
            ApiSuccess::new(
                StatusCode::OK,
                "Enquiries retrieved successfully",
                page.into(),
            )
        })
}

/// Raw query string. Every value is optional and parsed leniently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListEnquiriesParams {
    page: Option<String>,
    limit: Option<String>,
    enquiry_type: Option<String>,
    date: Option<String>,
}

impl ListEnquiriesParams {
    fn into_query(self) -> EnquiryQuery {
        EnquiryQuery::from_params(
            self.page.as_deref(),
            self.limit.as_deref(),
            self.enquiry_type.as_deref(),
            self.date.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnquiryData {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub company_name: String,
    pub enquiry_type: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Enquiry> for EnquiryData {
    fn from(enquiry: &Enquiry) -> Self {
        Self {
            id: enquiry.id.to_string(),
            first_name: enquiry.first_name.clone(),
            last_name: enquiry.last_name.clone(),
            email: enquiry.email.clone(),
            phone_number: enquiry.phone_number.clone(),
            company_name: enquiry.company_name.clone(),
            enquiry_type: enquiry.enquiry_type.clone(),
            message: enquiry.message.clone(),
            created_at: enquiry.created_at,
            updated_at: enquiry.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationData {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub limit: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page: u64,
    pub previous_page: u64,
}

impl From<Pagination> for PaginationData {
    fn from(pagination: Pagination) -> Self {
        Self {
            current_page: pagination.current_page,
            total_pages: pagination.total_pages,
            total_count: pagination.total_count,
            limit: pagination.limit,
            has_next: pagination.has_next,
            has_previous: pagination.has_previous,
            next_page: pagination.next_page,
            previous_page: pagination.previous_page,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FiltersData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enquiry_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl From<EchoedFilters> for FiltersData {
    fn from(filters: EchoedFilters) -> Self {
        Self {
            enquiry_type: filters.enquiry_type,
            date: filters.date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEnquiriesResponseData {
    pub enquiries: Vec<EnquiryData>,
    pub pagination: PaginationData,
    pub filters: FiltersData,
}

impl From<EnquiryPage> for ListEnquiriesResponseData {
    fn from(page: EnquiryPage) -> Self {
        Self {
            enquiries: page.enquiries.iter().map(EnquiryData::from).collect(),
            pagination: page.pagination.into(),
            filters: page.filters.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_are_lenient() {
        let params = ListEnquiriesParams {
            page: Some("zero".to_string()),
            limit: Some("500".to_string()),
            enquiry_type: Some("sales".to_string()),
            date: Some("2024-13-40".to_string()),
        };

        let query = params.into_query();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 100);
        assert_eq!(query.filter.enquiry_type.as_deref(), Some("sales"));
        assert!(query.filter.created_between.is_none());
        assert_eq!(query.echoed.date.as_deref(), Some("2024-13-40"));
    }

    #[test]
    fn test_empty_filters_are_not_serialized() {
        let page = EnquiryPage {
            enquiries: Vec::new(),
            pagination: Pagination::new(1, 10, 0),
            filters: EchoedFilters::default(),
        };

        let json = serde_json::to_value(ListEnquiriesResponseData::from(page)).unwrap();
        assert_eq!(json["filters"], serde_json::json!({}));
        assert_eq!(json["pagination"]["total_pages"], 0);
        assert_eq!(json["pagination"]["has_next"], false);
    }
}
