use std::future::Future;
use std::time::Duration;

use thiserror::Error;

pub mod enquiry;
pub mod memory;
pub mod user;

pub use enquiry::PostgresEnquiryRepository;
pub use memory::InMemoryEnquiryRepository;
pub use memory::InMemoryUserRepository;
pub use user::PostgresUserRepository;

/// Failure of a single bounded store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Query(#[from] sqlx::Error),
}

impl StoreError {
    /// Name of the violated unique constraint, if that is what failed.
    pub fn unique_violation(&self) -> Option<&str> {
        match self {
            StoreError::Query(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                db_err.constraint()
            }
            _ => None,
        }
    }
}

/// Run a store operation under a deadline.
///
/// No retries: a timeout is reported like any other store failure.
pub(crate) async fn bounded<T, F>(limit: Duration, operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => {
            tracing::warn!(timeout_ms = limit.as_millis(), "Store operation timed out");
            Err(StoreError::Timeout(limit))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_result_through() {
        let result = bounded(Duration::from_secs(1), async { Ok::<_, sqlx::Error>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_bounded_times_out() {
        let result = bounded(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, sqlx::Error>(())
        })
        .await;

        assert!(matches!(result, Err(StoreError::Timeout(_))));
        assert!(result.unwrap_err().unique_violation().is_none());
    }

    #[tokio::test]
    async fn test_bounded_maps_query_errors() {
        let result = bounded(Duration::from_secs(1), async {
            Err::<(), _>(sqlx::Error::RowNotFound)
        })
        .await;

        assert!(matches!(result, Err(StoreError::Query(sqlx::Error::RowNotFound))));
    }
}
