use crate::db::error::DatabaseError;
use crate::db::filter::{RecordFilter, RecordPatch};
use crate::db::models::PlayerRecord;
use async_trait::async_trait;
use std::sync::Arc;

/// RecordStore trait defining the operations the cache core needs from the
/// player store
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Return every record matching `filter`
    async fn select(&self, filter: &RecordFilter) -> Result<Vec<PlayerRecord>, DatabaseError>;

    /// Apply `patch` to every record matching `filter` and return how many changed
    ///
    /// The whole update is a single statement; partial application is left to
    /// the backend's own atomicity guarantees.
    async fn update(&self, filter: &RecordFilter, patch: &RecordPatch)
        -> Result<u64, DatabaseError>;

    /// Delete every record matching `filter` and return how many were removed
    async fn delete(&self, filter: &RecordFilter) -> Result<u64, DatabaseError>;

    /// Insert a record (test-only)
    #[cfg(test)]
    async fn add_record(&self, record: PlayerRecord) -> Result<(), DatabaseError>;
}

/// Implementation of RecordStore trait for Arc<T> where T implements RecordStore
///
/// This allows one store instance to back the invalidator and the publish
/// lookup at the same time.
#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for Arc<T> {
    async fn select(&self, filter: &RecordFilter) -> Result<Vec<PlayerRecord>, DatabaseError> {
        (**self).select(filter).await
    }

    async fn update(
        &self,
        filter: &RecordFilter,
        patch: &RecordPatch,
    ) -> Result<u64, DatabaseError> {
        (**self).update(filter, patch).await
    }

    async fn delete(&self, filter: &RecordFilter) -> Result<u64, DatabaseError> {
        (**self).delete(filter).await
    }

    #[cfg(test)]
    async fn add_record(&self, record: PlayerRecord) -> Result<(), DatabaseError> {
        (**self).add_record(record).await
    }
}
