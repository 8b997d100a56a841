//! Settlement logging: turn an approved plan into a training record.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::domain::foundation::IntentId;
use crate::domain::persona::Persona;
use crate::domain::settlement::{diff_plans, TrainingRecord};
use crate::ports::{StoreError, TrainingRecordStore};

/// Diffs the AI draft against the human-approved plan and appends the
/// resulting record to the training store.
#[derive(Clone)]
pub struct SettlementLogger {
    store: Arc<dyn TrainingRecordStore>,
}

impl SettlementLogger {
    pub fn new(store: Arc<dyn TrainingRecordStore>) -> Self {
        Self { store }
    }

    /// Settles one intent. The diff and timestamp are computed here, at the
    /// moment of approval; the record is immutable afterwards.
    pub async fn settle(
        &self,
        intent_id: IntentId,
        persona: Option<Persona>,
        original_plan: Value,
        final_plan: Value,
    ) -> Result<TrainingRecord, StoreError> {
        let diff = diff_plans(&original_plan, &final_plan);

        info!(
            intent_id = %intent_id.short(),
            acceptance_rate = diff.acceptance_rate,
            modifications = diff.modifications.len(),
            "settling intent"
        );

        let record = TrainingRecord::from_diff(
            intent_id,
            Utc::now(),
            persona,
            original_plan,
            final_plan,
            diff,
        );
        self.store.append(record.clone()).await?;
        Ok(record)
    }
}
