//! In-memory training record store.
//!
//! Suitable for tests and single-process deployments; records live only as
//! long as the process.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::settlement::TrainingRecord;
use crate::ports::{RecordFilter, StoreError, TrainingRecordStore};

/// Append-only in-memory store, insertion order preserved.
#[derive(Debug, Default)]
pub struct InMemoryTrainingStore {
    records: RwLock<Vec<TrainingRecord>>,
}

impl InMemoryTrainingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total records held, ignoring any filter.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TrainingRecordStore for InMemoryTrainingStore {
    async fn append(&self, record: TrainingRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn snapshot(&self, filter: &RecordFilter) -> Result<Vec<TrainingRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| filter.matches(r)).cloned().collect())
    }
}
