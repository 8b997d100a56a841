//! Training record - one observation of human correction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::diff::PlanDiff;
use crate::domain::foundation::IntentId;
use crate::domain::persona::Persona;

/// One settled intent: the AI draft, the human-approved final plan, and the
/// derived delta between them. Write-once; never recomputed even if the
/// source documents change later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub intent_id: IntentId,
    pub timestamp: DateTime<Utc>,
    /// None when the settling intent was never assigned a persona.
    pub persona: Option<Persona>,
    /// Snapshot taken at analysis time.
    pub original_plan: Value,
    /// Snapshot taken at approval time.
    pub final_plan: Value,
    /// Human-readable sentences, one per changed leaf.
    pub modifications: Vec<String>,
    /// Fraction of the original the human kept, in [0, 1].
    pub acceptance_rate: f64,
}

impl TrainingRecord {
    /// Builds a record from a computed diff and the two snapshots.
    pub fn from_diff(
        intent_id: IntentId,
        timestamp: DateTime<Utc>,
        persona: Option<Persona>,
        original_plan: Value,
        final_plan: Value,
        diff: PlanDiff,
    ) -> Self {
        Self {
            intent_id,
            timestamp,
            persona,
            original_plan,
            final_plan,
            modifications: diff.modifications,
            acceptance_rate: diff.acceptance_rate,
        }
    }

    /// True when the human edited the plan at all.
    pub fn was_edited(&self) -> bool {
        !self.modifications.is_empty()
    }
}
