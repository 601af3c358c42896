use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use uuid::Uuid;

use super::bounded;
use super::StoreError;
use crate::domain::enquiry::models::Enquiry;
use crate::domain::enquiry::models::EnquiryId;
use crate::domain::enquiry::ports::EnquiryRepository;
use crate::domain::enquiry::query::EnquiryFilter;
use crate::enquiry::errors::EnquiryError;

const SELECT_ENQUIRY: &str = r#"
    SELECT id, first_name, last_name, email, phone_number, company_name, enquiry_type,
           message, created_at, updated_at
    FROM enquiries
"#;

pub struct PostgresEnquiryRepository {
    pool: PgPool,
    operation_timeout: Duration,
}

impl PostgresEnquiryRepository {
    pub fn new(pool: PgPool, operation_timeout: Duration) -> Self {
        Self {
            pool,
            operation_timeout,
        }
    }
}

fn database_error(err: StoreError) -> EnquiryError {
    EnquiryError::DatabaseError(err.to_string())
}

/// Append `WHERE` clauses for a filter to a query under construction.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &EnquiryFilter) {
    builder.push(" WHERE TRUE");

    if let Some(enquiry_type) = &filter.enquiry_type {
        builder
            .push(" AND enquiry_type = ")
            .push_bind(enquiry_type.clone());
    }

    if let Some((start, end)) = filter.created_between {
        builder
            .push(" AND created_at >= ")
            .push_bind(start)
            .push(" AND created_at <= ")
            .push_bind(end);
    }
}

#[derive(Debug, FromRow)]
struct EnquiryRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
    company_name: String,
    enquiry_type: String,
    message: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EnquiryRow> for Enquiry {
    fn from(row: EnquiryRow) -> Self {
        Enquiry {
            id: EnquiryId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone_number: row.phone_number,
            company_name: row.company_name,
            enquiry_type: row.enquiry_type,
            message: row.message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl EnquiryRepository for PostgresEnquiryRepository {
    async fn create(&self, enquiry: Enquiry) -> Result<Enquiry, EnquiryError> {
        let query = sqlx::query(
            r#"
            INSERT INTO enquiries (id, first_name, last_name, email, phone_number, company_name,
                                   enquiry_type, message, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(enquiry.id.0)
        .bind(&enquiry.first_name)
        .bind(&enquiry.last_name)
        .bind(&enquiry.email)
        .bind(&enquiry.phone_number)
        .bind(&enquiry.company_name)
        .bind(&enquiry.enquiry_type)
        .bind(&enquiry.message)
        .bind(enquiry.created_at)
        .bind(enquiry.updated_at);

        bounded(self.operation_timeout, query.execute(&self.pool))
            .await
            .map_err(database_error)?;

        Ok(enquiry)
    }

    async fn find_by_id(&self, id: &EnquiryId) -> Result<Option<Enquiry>, EnquiryError> {
        let sql = format!("{} WHERE id = $1", SELECT_ENQUIRY);
        let query = sqlx::query_as::<_, EnquiryRow>(&sql).bind(id.0);

        let row = bounded(self.operation_timeout, query.fetch_optional(&self.pool))
            .await
            .map_err(database_error)?;

        Ok(row.map(Enquiry::from))
    }

    async fn find_page(
        &self,
        filter: &EnquiryFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Enquiry>, EnquiryError> {
        let mut builder = QueryBuilder::<Postgres>::new(SELECT_ENQUIRY);
        push_filter(&mut builder, filter);
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(skip).unwrap_or(i64::MAX));

        let query = builder.build_query_as::<EnquiryRow>();
        let rows = bounded(self.operation_timeout, query.fetch_all(&self.pool))
            .await
            .map_err(database_error)?;

        Ok(rows.into_iter().map(Enquiry::from).collect())
    }

    async fn count(&self, filter: &EnquiryFilter) -> Result<u64, EnquiryError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM enquiries");
        push_filter(&mut builder, filter);

        let query = builder.build_query_scalar::<i64>();
        let total = bounded(self.operation_timeout, query.fetch_one(&self.pool))
            .await
            .map_err(database_error)?;

        Ok(total.max(0) as u64)
    }
}
