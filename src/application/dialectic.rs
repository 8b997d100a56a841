//! Adversarial dialectic orchestration.
//!
//! Runs the growth and risk personas against the same intent concurrently,
//! then reconciles their competing recommendations with a synthesis call.
//! Every failure combination produces a usable `DialecticOutput`; the
//! orchestrator itself never errors.

use tracing::{error, info, instrument, warn};

use crate::application::analyzer::{AnalysisError, PersonaAnalyzer};
use crate::application::structured::StructuredClient;
use crate::domain::analysis::AgentAnalysis;
use crate::domain::dialectic::{DialecticOutput, DialecticPhase, SynthesisResult};
use crate::domain::intent::Intent;
use crate::domain::persona::RiskPosture;
use crate::ports::CompletionRequest;

const SYNTHESIS_MAX_TOKENS: u32 = 2048;

/// Orchestrates the growth-vs-risk dialectic for one intent.
#[derive(Clone)]
pub struct DialecticOrchestrator {
    analyzer: PersonaAnalyzer,
    client: StructuredClient,
}

impl DialecticOrchestrator {
    pub fn new(analyzer: PersonaAnalyzer, client: StructuredClient) -> Self {
        Self { analyzer, client }
    }

    /// Runs the full dialectic. Always returns an output; a failed call on
    /// either side degrades the result instead of aborting it.
    #[instrument(skip(self, intent), fields(intent_id = %intent.id().short()))]
    pub async fn run(&self, intent: &Intent) -> DialecticOutput {
        let mut phase = DialecticPhase::Pending;
        info!(?phase, "starting dialectic");

        // Slots stay None until their call succeeds, so every failure branch
        // below reads a well-defined state.
        let mut growth: Option<AgentAnalysis> = None;
        let mut risk: Option<AgentAnalysis> = None;

        phase = DialecticPhase::GrowthAndRiskInFlight;
        info!(?phase, "running growth and risk personas");

        // Sides are picked by posture, not by name.
        let (growth_result, risk_result) = tokio::join!(
            self.analyzer.analyze(RiskPosture::Growth.advocate(), intent),
            self.analyzer.analyze(RiskPosture::Defensive.advocate(), intent),
        );

        let growth_error = match growth_result {
            Ok(analysis) => {
                growth = Some(analysis);
                None
            }
            Err(e) => {
                warn!(error = %e, "growth analysis failed");
                Some(e)
            }
        };
        let risk_error = match risk_result {
            Ok(analysis) => {
                risk = Some(analysis);
                None
            }
            Err(e) => {
                warn!(error = %e, "risk analysis failed");
                Some(e)
            }
        };

        match (growth, risk) {
            (Some(growth), Some(risk)) => {
                phase = DialecticPhase::Synthesizing;
                info!(?phase, "both perspectives in hand, synthesizing");
                self.synthesize(intent, growth, risk).await
            }
            (growth @ Some(_), None) => DialecticOutput::one_sided(
                intent.id(),
                growth,
                None,
                "Risk",
                &error_text(risk_error),
            ),
            (None, risk @ Some(_)) => DialecticOutput::one_sided(
                intent.id(),
                None,
                risk,
                "Growth",
                &error_text(growth_error),
            ),
            (None, None) => {
                error!("both perspectives failed, nothing to reconcile");
                DialecticOutput::both_failed(
                    intent.id(),
                    &error_text(growth_error),
                    &error_text(risk_error),
                )
            }
        }
    }

    async fn synthesize(
        &self,
        intent: &Intent,
        growth: AgentAnalysis,
        risk: AgentAnalysis,
    ) -> DialecticOutput {
        let request = CompletionRequest::new(synthesis_prompt(&growth, &risk))
            .with_max_tokens(SYNTHESIS_MAX_TOKENS);

        match self.client.complete_json::<SynthesisResult>(request).await {
            Ok(synthesis) => {
                info!(recommended_path = %synthesis.recommended_path, "dialectic synthesis complete");
                DialecticOutput::complete(intent.id(), growth, risk, synthesis)
            }
            Err(e) => {
                warn!(error = %e, "synthesis failed, keeping both raw perspectives");
                DialecticOutput::synthesis_failed(intent.id(), growth, risk, &e.to_string())
            }
        }
    }
}

fn error_text(error: Option<AnalysisError>) -> String {
    error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "unknown error".to_string())
}

fn synthesis_prompt(growth: &AgentAnalysis, risk: &AgentAnalysis) -> String {
    let lead = growth.recommended().or(growth.options.first());
    let pros = lead.map(|o| o.pros.join(", ")).unwrap_or_default();
    let cons = lead.map(|o| o.cons.join(", ")).unwrap_or_default();
    let growth_voice = RiskPosture::Growth.advocate();
    let risk_voice = RiskPosture::Defensive.advocate();

    format!(
        r#"You are a strategic synthesizer. Two AI agents have analyzed the same intent from opposing perspectives:

GROWTH PERSPECTIVE ({growth_voice}, {growth_posture} posture):
- Recommended: Option {growth_option}
- Rationale: {growth_rationale}
- Key pros: {pros}
- Key cons: {cons}

RISK PERSPECTIVE ({risk_voice}, {risk_posture} posture):
- Recommended: Option {risk_option}
- Rationale: {risk_rationale}
- Key concerns: {risk_concerns}

Your task:
1. Identify conflict points where these agents disagree
2. Synthesize a balanced recommendation that honors both perspectives
3. Suggest a path forward that maximizes upside while managing risks

Respond in JSON:
{{
  "synthesis": "2-3 sentence synthesis of both perspectives",
  "recommended_path": "Which option or hybrid approach to take",
  "conflict_points": ["Point 1 where they disagree", "Point 2", ...]
}}"#,
        growth_posture = growth_voice.posture(),
        risk_posture = risk_voice.posture(),
        growth_option = growth.recommended_option,
        growth_rationale = growth.rationale,
        risk_option = risk.recommended_option,
        risk_rationale = risk.rationale,
        risk_concerns = risk.risk_assessment,
    )
}
