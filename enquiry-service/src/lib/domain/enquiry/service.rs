use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::enquiry::errors::EnquiryError;
use crate::enquiry::models::Enquiry;
use crate::enquiry::models::EnquiryId;
use crate::enquiry::models::NewEnquiry;
use crate::enquiry::ports::EnquiryRepository;
use crate::enquiry::ports::EnquiryServicePort;
use crate::enquiry::query::EnquiryPage;
use crate::enquiry::query::EnquiryQuery;
use crate::enquiry::query::Pagination;

/// Domain service implementation for enquiry operations.
pub struct EnquiryService<ER>
where
    ER: EnquiryRepository,
{
    repository: Arc<ER>,
}

impl<ER> EnquiryService<ER>
where
    ER: EnquiryRepository,
{
    /// Create a new enquiry service.
    ///
    /// # Arguments
    /// * `repository` - Enquiry persistence implementation
    pub fn new(repository: Arc<ER>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<ER> EnquiryServicePort for EnquiryService<ER>
where
    ER: EnquiryRepository,
{
    async fn submit_enquiry(&self, submission: NewEnquiry) -> Result<Enquiry, EnquiryError> {
        let enquiry = Enquiry::from_submission(submission, Utc::now());
        let created = self.repository.create(enquiry).await?;

        tracing::info!(
            enquiry_id = %created.id,
            enquiry_type = %created.enquiry_type,
            "Enquiry submitted"
        );

        Ok(created)
    }

    async fn get_enquiry(&self, id: &EnquiryId) -> Result<Enquiry, EnquiryError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(EnquiryError::NotFound(id.to_string()))
    }

    async fn list_enquiries(&self, query: EnquiryQuery) -> Result<EnquiryPage, EnquiryError> {
        let total_count = self.repository.count(&query.filter).await?;
        let enquiries = self
            .repository
            .find_page(&query.filter, query.skip(), query.limit)
            .await?;

        tracing::debug!(
            page = query.page,
            limit = query.limit,
            total_count,
            returned = enquiries.len(),
            "Enquiries listed"
        );

        Ok(EnquiryPage {
            enquiries,
            pagination: Pagination::new(query.page, query.limit, total_count),
            filters: query.echoed,
        })
    }
}
