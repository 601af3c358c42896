use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::enquiry::errors::EnquiryIdError;
use crate::enquiry::errors::EnquiryValidationError;

/// Enquiry aggregate entity.
///
/// Append-only: once stored an enquiry is never updated or deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct Enquiry {
    pub id: EnquiryId,
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

impl Enquiry {
    /// Stamp a validated submission with an identity and creation time.
    pub fn from_submission(submission: NewEnquiry, now: DateTime<Utc>) -> Self {
        Self {
            id: EnquiryId::new(),
            first_name: submission.first_name,
            last_name: submission.last_name,
            email: submission.email,
            phone_number: submission.phone_number,
            company_name: submission.company_name,
            enquiry_type: submission.enquiry_type,
            message: submission.message,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Enquiry unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnquiryId(pub Uuid);

impl EnquiryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an enquiry ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, EnquiryIdError> {
        Uuid::parse_str(s)
            .map(EnquiryId)
            .map_err(|e| EnquiryIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for EnquiryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EnquiryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A validated enquiry submission, not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnquiry {
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    company_name: String,
    enquiry_type: String,
    message: String,
}

impl NewEnquiry {
    const MAX_EMAIL_LENGTH: usize = 255;

    /// Validate a raw submission.
    ///
    /// Contact fields other than email are free text; phone number, company
    /// and enquiry type may be empty.
    ///
    /// # Errors
    /// * `MissingRequiredFields` - first_name, last_name, email or message is empty
    /// * `EmailTooLong` - Email is 255 characters or longer
    /// * `EmailMissingDomain` - Email lacks `@` or `.`
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        phone_number: String,
        company_name: String,
        enquiry_type: String,
        message: String,
    ) -> Result<Self, EnquiryValidationError> {
        if first_name.is_empty() || last_name.is_empty() || email.is_empty() || message.is_empty()
        {
            return Err(EnquiryValidationError::MissingRequiredFields);
        }
        if email.len() >= Self::MAX_EMAIL_LENGTH {
            return Err(EnquiryValidationError::EmailTooLong);
        }
        if !email.contains('@') || !email.contains('.') {
            return Err(EnquiryValidationError::EmailMissingDomain);
        }

        Ok(Self {
            first_name,
            last_name,
            email,
            phone_number,
            company_name,
            enquiry_type,
            message,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn enquiry_type(&self) -> &str {
        &self.enquiry_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(email: &str, message: &str) -> Result<NewEnquiry, EnquiryValidationError> {
        NewEnquiry::new(
            "Jane".to_string(),
            "Roe".to_string(),
            email.to_string(),
            String::new(),
            String::new(),
            "sales".to_string(),
            message.to_string(),
        )
    }

    #[test]
    fn test_valid_submission() {
        let enquiry = submission("jane@example.com", "Hello").unwrap();
        assert_eq!(enquiry.email(), "jane@example.com");
        assert_eq!(enquiry.enquiry_type(), "sales");
    }

    #[test]
    fn test_missing_required_fields() {
        assert_eq!(
            submission("jane@example.com", ""),
            Err(EnquiryValidationError::MissingRequiredFields)
        );
        assert_eq!(
            submission("", "Hello"),
            Err(EnquiryValidationError::MissingRequiredFields)
        );
    }

    #[test]
    fn test_email_checks() {
        assert_eq!(
            submission("jane.example.com", "Hello"),
            Err(EnquiryValidationError::EmailMissingDomain)
        );
        assert_eq!(
            submission("jane@localhost", "Hello"),
            Err(EnquiryValidationError::EmailMissingDomain)
        );

        let long_email = format!("{}@example.com", "a".repeat(243));
        assert_eq!(long_email.len(), 255);
        assert_eq!(
            submission(&long_email, "Hello"),
            Err(EnquiryValidationError::EmailTooLong)
        );
    }

    #[test]
    fn test_from_submission_stamps_times() {
        let now = Utc::now();
        let enquiry = Enquiry::from_submission(submission("jane@example.com", "Hi").unwrap(), now);

        assert_eq!(enquiry.created_at, now);
        assert_eq!(enquiry.updated_at, now);
        assert_eq!(enquiry.message, "Hi");
    }
}
