//! Training Record Store Port - append-only persistence for settlements.
//!
//! Records are ground truth for downstream mining and export, so the store
//! exposes no update or delete operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::persona::Persona;
use crate::domain::settlement::TrainingRecord;

/// Port for persisting and reading back settlement records.
#[async_trait]
pub trait TrainingRecordStore: Send + Sync {
    /// Appends one record. Records are immutable once written.
    async fn append(&self, record: TrainingRecord) -> Result<(), StoreError>;

    /// Returns a snapshot of records matching the filter, oldest first.
    async fn snapshot(&self, filter: &RecordFilter) -> Result<Vec<TrainingRecord>, StoreError>;
}

/// Which records a snapshot should include.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Restrict to one persona's settlements.
    pub persona: Option<Persona>,
    /// Restrict to settlements at or after this instant.
    pub since: Option<DateTime<Utc>>,
}

impl RecordFilter {
    /// Matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_persona(persona: Persona) -> Self {
        Self {
            persona: Some(persona),
            ..Self::default()
        }
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn matches(&self, record: &TrainingRecord) -> bool {
        self.persona.map_or(true, |p| record.persona == Some(p))
            && self.since.map_or(true, |t| record.timestamp >= t)
    }
}

/// Training store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying storage failed.
    #[error("storage error: {message}")]
    Storage {
        /// Error details.
        message: String,
    },

    /// Record failed to serialize or deserialize.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
