use crate::db::error::DatabaseError;
use crate::db::filter::{RecordFilter, RecordPatch};
use crate::db::models::PlayerRecord;
use crate::db::store::RecordStore;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Store operations that can be made to fail on purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeOperation {
    Select,
    Update,
    Delete,
}

/// A fake in-memory implementation of the RecordStore trait for testing
#[derive(Clone, Default)]
pub struct FakeRecordStore {
    records: Arc<RwLock<HashMap<Uuid, PlayerRecord>>>,
    fail_operations: Arc<RwLock<HashSet<FakeOperation>>>,
    mutations: Arc<RwLock<u64>>,
}

impl FakeRecordStore {
    /// Create a new empty FakeRecordStore
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, replacing any record with the same id
    pub fn fake_add_record(&self, record: PlayerRecord) {
        let mut records = self.records.write().unwrap();
        records.insert(record.id, record);
    }

    /// Make every subsequent call of `operation` fail
    pub fn fake_fail(&self, operation: FakeOperation) {
        let mut fail_operations = self.fail_operations.write().unwrap();
        fail_operations.insert(operation);
    }

    /// Stop failing `operation`
    pub fn fake_recover(&self, operation: FakeOperation) {
        let mut fail_operations = self.fail_operations.write().unwrap();
        fail_operations.remove(&operation);
    }

    /// Snapshot of a single record
    pub fn fake_get(&self, id: Uuid) -> Option<PlayerRecord> {
        let records = self.records.read().unwrap();
        records.get(&id).cloned()
    }

    /// Number of records currently held
    pub fn fake_len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Number of successful update/delete calls so far
    pub fn fake_mutation_count(&self) -> u64 {
        *self.mutations.read().unwrap()
    }

    fn check_failure(&self, operation: FakeOperation) -> Result<(), DatabaseError> {
        let fail_operations = self.fail_operations.read().unwrap();
        if fail_operations.contains(&operation) {
            return Err(DatabaseError::QueryError(format!(
                "Simulated failure for {:?}",
                operation
            )));
        }
        Ok(())
    }

    fn record_mutation(&self) {
        let mut mutations = self.mutations.write().unwrap();
        *mutations += 1;
    }
}

#[async_trait]
impl RecordStore for FakeRecordStore {
    async fn select(&self, filter: &RecordFilter) -> Result<Vec<PlayerRecord>, DatabaseError> {
        self.check_failure(FakeOperation::Select)?;

        let records = self.records.read().unwrap();
        let mut matching: Vec<PlayerRecord> = records
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();

        // Same ordering as the PostgreSQL store
        matching.sort_by(|a, b| {
            (a.riot_id.as_str(), a.tag_line.as_str()).cmp(&(b.riot_id.as_str(), b.tag_line.as_str()))
        });
        Ok(matching)
    }

    async fn update(
        &self,
        filter: &RecordFilter,
        patch: &RecordPatch,
    ) -> Result<u64, DatabaseError> {
        self.check_failure(FakeOperation::Update)?;

        let mut records = self.records.write().unwrap();
        let mut affected = 0;
        for record in records.values_mut().filter(|record| filter.matches(record)) {
            patch.apply(record);
            affected += 1;
        }
        drop(records);

        self.record_mutation();
        Ok(affected)
    }

    async fn delete(&self, filter: &RecordFilter) -> Result<u64, DatabaseError> {
        self.check_failure(FakeOperation::Delete)?;

        let mut records = self.records.write().unwrap();
        let before = records.len();
        records.retain(|_, record| !filter.matches(record));
        let affected = (before - records.len()) as u64;
        drop(records);

        self.record_mutation();
        Ok(affected)
    }

    async fn add_record(&self, record: PlayerRecord) -> Result<(), DatabaseError> {
        self.fake_add_record(record);
        Ok(())
    }
}
