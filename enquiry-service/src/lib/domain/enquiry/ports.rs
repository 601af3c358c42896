use async_trait::async_trait;

use crate::enquiry::errors::EnquiryError;
use crate::enquiry::models::Enquiry;
use crate::enquiry::models::EnquiryId;
use crate::enquiry::models::NewEnquiry;
use crate::enquiry::query::EnquiryFilter;
use crate::enquiry::query::EnquiryPage;
use crate::enquiry::query::EnquiryQuery;

/// Port for enquiry domain service operations.
#[async_trait]
pub trait EnquiryServicePort: Send + Sync + 'static {
    /// Store a validated submission.
    ///
    /// # Returns
    /// Stored enquiry with its identifier and creation time
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn submit_enquiry(&self, submission: NewEnquiry) -> Result<Enquiry, EnquiryError>;

    /// Retrieve enquiry by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - Enquiry does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_enquiry(&self, id: &EnquiryId) -> Result<Enquiry, EnquiryError>;

    /// Retrieve one page of enquiries, newest first.
    ///
    /// # Arguments
    /// * `query` - Normalised page request and filter
    ///
    /// # Returns
    /// Matching enquiries with pagination descriptor and echoed filters
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_enquiries(&self, query: EnquiryQuery) -> Result<EnquiryPage, EnquiryError>;
}

/// Persistence operations for enquiry aggregate.
///
/// No update or delete exists: stored enquiries are immutable.
#[async_trait]
pub trait EnquiryRepository: Send + Sync + 'static {
    /// Persist new enquiry to storage.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, enquiry: Enquiry) -> Result<Enquiry, EnquiryError>;

    /// Retrieve enquiry by identifier.
    ///
    /// # Returns
    /// Optional enquiry entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &EnquiryId) -> Result<Option<Enquiry>, EnquiryError>;

    /// Retrieve matching enquiries ordered by creation time, newest first.
    ///
    /// # Arguments
    /// * `filter` - Type and date constraints
    /// * `skip` - Number of matching records to pass over
    /// * `limit` - Maximum number of records to return
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_page(
        &self,
        filter: &EnquiryFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Enquiry>, EnquiryError>;

    /// Count enquiries matching a filter.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn count(&self, filter: &EnquiryFilter) -> Result<u64, EnquiryError>;
}
