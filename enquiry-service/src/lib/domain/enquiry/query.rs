//! Listing queries over the enquiry collection.
//!
//! Turns loosely-typed request parameters into a normalised page request
//! and a store filter, and computes the pagination descriptor for a result.
//! Results are always ordered newest first.

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;

use crate::enquiry::models::Enquiry;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Store-level filter for enquiry listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnquiryFilter {
    /// Exact match on the enquiry type.
    pub enquiry_type: Option<String>,
    /// Inclusive bounds on the creation time.
    pub created_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl EnquiryFilter {
    pub fn matches(&self, enquiry: &Enquiry) -> bool {
        let type_matches = self
            .enquiry_type
            .as_deref()
            .map_or(true, |enquiry_type| enquiry.enquiry_type == enquiry_type);

        let date_matches = self.created_between.map_or(true, |(start, end)| {
            enquiry.created_at >= start && enquiry.created_at <= end
        });

        type_matches && date_matches
    }
}

/// Filters echoed back to the caller exactly as supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EchoedFilters {
    pub enquiry_type: Option<String>,
    pub date: Option<String>,
}

/// A normalised listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnquiryQuery {
    pub page: u64,
    pub limit: u64,
    pub filter: EnquiryFilter,
    pub echoed: EchoedFilters,
}

impl EnquiryQuery {
    /// Build a query from raw request parameters.
    ///
    /// Never fails: out-of-range or unparseable values fall back to their
    /// defaults and an unparseable date is dropped from the filter while
    /// still being echoed.
    ///
    /// # Arguments
    /// * `page` - 1-based page number, default 1
    /// * `limit` - Page size, default 10, capped at 100
    /// * `enquiry_type` - Exact enquiry type, ignored when empty
    /// * `date` - Calendar day `YYYY-MM-DD` in UTC, ignored when empty
    pub fn from_params(
        page: Option<&str>,
        limit: Option<&str>,
        enquiry_type: Option<&str>,
        date: Option<&str>,
    ) -> Self {
        let page = parse_positive(page).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(limit)
            .map(|limit| limit.min(MAX_LIMIT))
            .unwrap_or(DEFAULT_LIMIT);

        let enquiry_type = enquiry_type
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        let date = date.filter(|value| !value.is_empty()).map(str::to_string);

        let created_between = date.as_deref().and_then(|raw| {
            let bounds = day_bounds(raw);
            if bounds.is_none() {
                tracing::debug!(date = %raw, "Ignoring unparseable date filter");
            }
            bounds
        });

        Self {
            page,
            limit,
            filter: EnquiryFilter {
                enquiry_type: enquiry_type.clone(),
                created_between,
            },
            echoed: EchoedFilters { enquiry_type, date },
        }
    }

    /// Number of matching records before this page, saturating for pages
    /// far beyond any stored data.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for EnquiryQuery {
    fn default() -> Self {
        Self::from_params(None, None, None, None)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|value| value.parse::<i64>().ok())
        .filter(|value| *value > 0)
        .map(|value| value as u64)
}

/// First and last representable instant of a UTC calendar day.
fn day_bounds(raw: &str) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let day = NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()?;
    let start = day.and_hms_opt(0, 0, 0)?.and_utc();
    let end = day.and_hms_nano_opt(23, 59, 59, 999_999_999)?.and_utc();
    Some((start, end))
}

/// Pagination descriptor for one page of results.
///
/// `next_page` and `previous_page` are plain arithmetic and may point
/// outside the valid range; `has_next` and `has_previous` say whether they
/// are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub limit: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page: u64,
    pub previous_page: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total_count: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_count.div_ceil(limit)
        };

        Self {
            current_page: page,
            total_pages,
            total_count,
            limit,
            has_next: page < total_pages,
            has_previous: page > 1,
            next_page: page.saturating_add(1),
            previous_page: page.saturating_sub(1),
        }
    }
}

/// One page of enquiries with its descriptor and the echoed filters.
#[derive(Debug, Clone, PartialEq)]
pub struct EnquiryPage {
    pub enquiries: Vec<Enquiry>,
    pub pagination: Pagination,
    pub filters: EchoedFilters,
}
