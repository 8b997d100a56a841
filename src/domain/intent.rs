//! Intent - a strategic question under consideration.
//!
//! Intents arrive from the upstream ingestion layer and are read-only to
//! this crate: nothing here mutates one after construction.

use serde::{Deserialize, Serialize};

use super::foundation::IntentId;
use super::persona::Persona;

/// Risk level assigned to an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Triage category for inbox content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    /// Requires decision analysis through the dialectic pipeline.
    Strategic,
    /// Clear next action, executed without analysis.
    Operational,
    /// Knowledge to store for later.
    Reference,
}

/// A strategic question supplied by the ingestion layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    id: IntentId,
    title: String,
    description: String,
    success_criteria: Option<String>,
    risk_level: RiskLevel,
    projected_impact: u8,
    persona: Option<Persona>,
}

impl Intent {
    /// Creates an intent. Projected impact is clamped to the declared 1-10 range.
    pub fn new(
        id: IntentId,
        title: impl Into<String>,
        description: impl Into<String>,
        risk_level: RiskLevel,
        projected_impact: u8,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            success_criteria: None,
            risk_level,
            projected_impact: projected_impact.clamp(1, 10),
            persona: None,
        }
    }

    /// Sets the success criteria.
    pub fn with_success_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.success_criteria = Some(criteria.into());
        self
    }

    /// Sets the assigned persona.
    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = Some(persona);
        self
    }

    pub fn id(&self) -> IntentId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn success_criteria(&self) -> Option<&str> {
        self.success_criteria.as_deref()
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn projected_impact(&self) -> u8 {
        self.projected_impact
    }

    pub fn persona(&self) -> Option<Persona> {
        self.persona
    }
}

/// Marker prefixed to the title of a fallback classification.
pub const NEEDS_REVIEW_MARKER: &str = "NEEDS MANUAL REVIEW";

/// Outcome of triaging freeform inbox content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub kind: IntentKind,
    pub title: String,
    pub rationale: String,
    pub suggested_persona: Option<Persona>,
    pub risk: Option<RiskLevel>,
    pub impact: Option<u8>,
    /// Next action, populated for operational intents.
    pub next_action: Option<String>,
    /// True when classification failed and a human must triage by hand.
    pub needs_manual_review: bool,
}

impl Classification {
    /// The safe default when classification fails for any reason.
    ///
    /// Always strategic: operational routing bypasses analysis entirely and
    /// would silently hide a decision that deserved review.
    pub fn needs_review(reason: impl Into<String>) -> Self {
        Self {
            kind: IntentKind::Strategic,
            title: format!("{} - classification failed", NEEDS_REVIEW_MARKER),
            rationale: format!(
                "Classification failed: {}. Defaulting to strategic for manual review.",
                reason.into()
            ),
            suggested_persona: Some(Persona::Entrepreneur),
            risk: Some(RiskLevel::Medium),
            impact: Some(5),
            next_action: None,
            needs_manual_review: true,
        }
    }
}
