//! Intent triage: strategic, operational, or reference.
//!
//! Classification is infallible by contract: any provider or parse failure
//! degrades to a strategic classification flagged for manual review, so a
//! broken model call can never silently route a decision past a human.

use serde::Deserialize;
use tracing::{info, warn};

use crate::application::structured::StructuredClient;
use crate::domain::intent::{Classification, IntentKind, RiskLevel};
use crate::domain::persona::Persona;
use crate::ports::CompletionRequest;

const CLASSIFY_MAX_TOKENS: u32 = 1024;

/// Triages freeform inbox content into an intent classification.
#[derive(Clone)]
pub struct IntentClassifier {
    client: StructuredClient,
}

impl IntentClassifier {
    pub fn new(client: StructuredClient) -> Self {
        Self { client }
    }

    /// Classifies the content. Never returns an error: failures fall back
    /// to a strategic classification marked for manual review.
    pub async fn classify(&self, content: &str) -> Classification {
        let request =
            CompletionRequest::new(classification_prompt(content)).with_max_tokens(CLASSIFY_MAX_TOKENS);

        let wire: ClassificationWire = match self.client.complete_json(request).await {
            Ok(wire) => wire,
            Err(e) => {
                warn!(error = %e, "classification call failed, defaulting to manual review");
                return Classification::needs_review(e.to_string());
            }
        };

        match wire.into_classification() {
            Ok(classification) => {
                info!(kind = ?classification.kind, "intent classified");
                classification
            }
            Err(reason) => {
                warn!(%reason, "classification response invalid, defaulting to manual review");
                Classification::needs_review(reason)
            }
        }
    }
}

fn classification_prompt(content: &str) -> String {
    format!(
        r#"Triage this input from my system inbox:

{content}

Classify as:
- 'strategic' (requires decision analysis, multiple options, or high impact > $1000)
- 'operational' (clear next action, can execute immediately)
- 'reference' (knowledge to store for later)

Respond ONLY with valid JSON (no markdown):
{{
  "type": "strategic|operational|reference",
  "title": "...",
  "agent": "The Entrepreneur|The Quant|The Auditor",
  "risk": "Low|Medium|High",
  "impact": 1-10,
  "next_action": "..." (if operational),
  "rationale": "Why this classification"
}}"#
    )
}

/// Wire shape the classification prompt demands. Loosely typed on purpose:
/// strictness lives in `into_classification`, where a bad value degrades
/// to manual review instead of an error.
#[derive(Debug, Deserialize)]
struct ClassificationWire {
    #[serde(rename = "type")]
    kind: String,
    title: String,
    #[serde(default)]
    agent: Option<String>,
    #[serde(default)]
    risk: Option<String>,
    #[serde(default)]
    impact: Option<u8>,
    #[serde(default)]
    next_action: Option<String>,
    #[serde(default)]
    rationale: String,
}

impl ClassificationWire {
    fn into_classification(self) -> Result<Classification, String> {
        let kind = match self.kind.as_str() {
            "strategic" => IntentKind::Strategic,
            "operational" => IntentKind::Operational,
            "reference" => IntentKind::Reference,
            other => return Err(format!("unknown intent type '{other}'")),
        };

        let suggested_persona = self.agent.as_deref().and_then(|a| a.parse::<Persona>().ok());
        let risk = self.risk.as_deref().and_then(|r| match r {
            "Low" | "low" => Some(RiskLevel::Low),
            "Medium" | "medium" => Some(RiskLevel::Medium),
            "High" | "high" => Some(RiskLevel::High),
            _ => None,
        });

        Ok(Classification {
            kind,
            title: self.title,
            rationale: self.rationale,
            suggested_persona,
            risk,
            impact: self.impact.map(|i| i.clamp(1, 10)),
            next_action: self.next_action,
            needs_manual_review: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockCompletionProvider, MockError};
    use crate::domain::intent::NEEDS_REVIEW_MARKER;
    use std::sync::Arc;

    fn classifier(provider: MockCompletionProvider) -> IntentClassifier {
        IntentClassifier::new(StructuredClient::new(Arc::new(provider)))
    }

    #[tokio::test]
    async fn well_formed_responses_classify_cleanly() {
        let provider = MockCompletionProvider::new().with_response(
            r#"{
                "type": "strategic",
                "title": "Enter the EU market",
                "agent": "The Quant",
                "risk": "High",
                "impact": 8,
                "rationale": "Large irreversible investment"
            }"#,
        );

        let classification = classifier(provider).classify("should we expand to the EU?").await;

        assert_eq!(classification.kind, IntentKind::Strategic);
        assert_eq!(classification.suggested_persona, Some(Persona::Quant));
        assert_eq!(classification.risk, Some(RiskLevel::High));
        assert_eq!(classification.impact, Some(8));
        assert!(!classification.needs_manual_review);
    }

    #[tokio::test]
    async fn operational_intents_carry_a_next_action() {
        let provider = MockCompletionProvider::new().with_response(
            r#"{
                "type": "operational",
                "title": "Renew the SSL cert",
                "next_action": "Run certbot renew on the edge host",
                "rationale": "Single clear action"
            }"#,
        );

        let classification = classifier(provider).classify("ssl cert expires friday").await;

        assert_eq!(classification.kind, IntentKind::Operational);
        assert_eq!(
            classification.next_action.as_deref(),
            Some("Run certbot renew on the edge host")
        );
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_manual_review_never_operational() {
        let provider = MockCompletionProvider::new().with_error(MockError::Unavailable {
            message: "upstream down".to_string(),
        });

        let classification = classifier(provider).classify("anything").await;

        assert_eq!(classification.kind, IntentKind::Strategic);
        assert!(classification.needs_manual_review);
        assert!(classification.title.contains(NEEDS_REVIEW_MARKER));
    }

    #[tokio::test]
    async fn garbage_json_degrades_to_manual_review() {
        let provider = MockCompletionProvider::new().with_response("not json at all");
        let classification = classifier(provider).classify("anything").await;

        assert_eq!(classification.kind, IntentKind::Strategic);
        assert!(classification.needs_manual_review);
    }

    #[tokio::test]
    async fn unknown_intent_type_degrades_to_manual_review() {
        let provider = MockCompletionProvider::new().with_response(
            r#"{"type": "existential", "title": "hmm", "rationale": ""}"#,
        );
        let classification = classifier(provider).classify("anything").await;

        assert_eq!(classification.kind, IntentKind::Strategic);
        assert!(classification.needs_manual_review);
        assert!(classification.rationale.contains("existential"));
    }

    #[tokio::test]
    async fn out_of_range_impact_is_clamped() {
        let provider = MockCompletionProvider::new().with_response(
            r#"{"type": "reference", "title": "notes", "impact": 99, "rationale": "keep"}"#,
        );
        let classification = classifier(provider).classify("interesting article").await;

        assert_eq!(classification.kind, IntentKind::Reference);
        assert_eq!(classification.impact, Some(10));
    }
}
