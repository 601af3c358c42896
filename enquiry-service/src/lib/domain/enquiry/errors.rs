use thiserror::Error;

/// Error for EnquiryId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnquiryIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for incoming enquiry validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnquiryValidationError {
    #[error("first_name, last_name, email, and message are required")]
    MissingRequiredFields,

    #[error("Please provide a valid email address")]
    EmailTooLong,

    #[error("Email must contain @ and domain")]
    EmailMissingDomain,
}

/// Top-level error for all enquiry-related operations
#[derive(Debug, Clone, Error)]
pub enum EnquiryError {
    #[error("Invalid enquiry: {0}")]
    Validation(#[from] EnquiryValidationError),

    #[error("Invalid enquiry ID: {0}")]
    InvalidId(#[from] EnquiryIdError),

    #[error("Enquiry not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for EnquiryError {
    fn from(err: anyhow::Error) -> Self {
        EnquiryError::Unknown(err.to_string())
    }
}
