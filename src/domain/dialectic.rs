//! Dialectic reconciliation artifacts.
//!
//! A dialectic run moves through a fixed phase sequence:
//! `Pending -> GrowthAndRiskInFlight -> Synthesizing -> Complete` (or
//! `CompleteDegraded` on partial failure; there is no other terminal state).
//! The orchestrator in the application layer drives the transitions; this
//! module holds the artifact shapes and the degraded-mode constructors so
//! the fallback text is defined in exactly one place.

use serde::{Deserialize, Serialize};

use super::analysis::AgentAnalysis;
use super::foundation::IntentId;

/// Recommended path emitted when no perspective survived.
pub const MANUAL_REVIEW_REQUIRED: &str = "Manual review required";

/// Phases of a dialectic run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialecticPhase {
    Pending,
    GrowthAndRiskInFlight,
    Synthesizing,
    Complete,
    CompleteDegraded,
}

impl DialecticPhase {
    /// True for the two states a run may finish in.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DialecticPhase::Complete | DialecticPhase::CompleteDegraded
        )
    }
}

/// Wire shape of the synthesis completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisResult {
    pub synthesis: String,
    pub recommended_path: String,
    pub conflict_points: Vec<String>,
}

/// The reconciliation artifact for one intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialecticOutput {
    pub intent_id: IntentId,
    /// Absent if the growth persona's call failed.
    pub growth_perspective: Option<AgentAnalysis>,
    /// Absent if the risk persona's call failed.
    pub risk_perspective: Option<AgentAnalysis>,
    pub synthesis: String,
    pub recommended_path: String,
    pub conflict_points: Vec<String>,
    pub phase: DialecticPhase,
}

impl DialecticOutput {
    /// Both perspectives succeeded and the synthesis call came back.
    pub fn complete(
        intent_id: IntentId,
        growth: AgentAnalysis,
        risk: AgentAnalysis,
        synthesis: SynthesisResult,
    ) -> Self {
        Self {
            intent_id,
            growth_perspective: Some(growth),
            risk_perspective: Some(risk),
            synthesis: synthesis.synthesis,
            recommended_path: synthesis.recommended_path,
            conflict_points: synthesis.conflict_points,
            phase: DialecticPhase::Complete,
        }
    }

    /// Exactly one perspective succeeded: skip synthesis, surface the
    /// survivor's own recommendation, and name the failure.
    pub fn one_sided(
        intent_id: IntentId,
        growth: Option<AgentAnalysis>,
        risk: Option<AgentAnalysis>,
        failed_side: &str,
        error: &str,
    ) -> Self {
        debug_assert!(growth.is_some() != risk.is_some());
        let survivor = growth.as_ref().or(risk.as_ref());
        let recommended_path = survivor
            .map(|a| a.recommended_option.clone())
            .unwrap_or_else(|| MANUAL_REVIEW_REQUIRED.to_string());

        Self {
            intent_id,
            growth_perspective: growth,
            risk_perspective: risk,
            synthesis: format!("{failed_side} analysis failed: {error}"),
            recommended_path,
            conflict_points: vec![format!("{failed_side} analysis failed: {error}")],
            phase: DialecticPhase::CompleteDegraded,
        }
    }

    /// Both perspectives succeeded but the reconciling call failed. The
    /// underlying analyses are preserved; the growth recommendation stands
    /// in for the missing synthesis.
    pub fn synthesis_failed(
        intent_id: IntentId,
        growth: AgentAnalysis,
        risk: AgentAnalysis,
        error: &str,
    ) -> Self {
        let recommended_path = growth.recommended_option.clone();
        Self {
            intent_id,
            growth_perspective: Some(growth),
            risk_perspective: Some(risk),
            synthesis: format!("Synthesis failed: {error}"),
            recommended_path,
            conflict_points: vec![format!("Synthesis failed: {error}")],
            phase: DialecticPhase::CompleteDegraded,
        }
    }

    /// Both perspectives failed. Never fabricates agreement.
    pub fn both_failed(intent_id: IntentId, growth_error: &str, risk_error: &str) -> Self {
        Self {
            intent_id,
            growth_perspective: None,
            risk_perspective: None,
            synthesis: format!(
                "Both analyses failed. Growth: {growth_error}. Risk: {risk_error}"
            ),
            recommended_path: MANUAL_REVIEW_REQUIRED.to_string(),
            conflict_points: vec![format!(
                "Both analyses failed. Growth: {growth_error}. Risk: {risk_error}"
            )],
            phase: DialecticPhase::CompleteDegraded,
        }
    }

    /// True when one or both underlying analyses (or the synthesis) failed.
    pub fn is_degraded(&self) -> bool {
        self.phase == DialecticPhase::CompleteDegraded
    }
}
