//! Persona analysis: one intent through one persona's lens.

use thiserror::Error;
use tracing::info;

use crate::application::structured::StructuredClient;
use crate::domain::analysis::AgentAnalysis;
use crate::domain::foundation::ValidationError;
use crate::domain::intent::Intent;
use crate::domain::persona::Persona;
use crate::ports::{CompletionError, CompletionRequest};

const ANALYSIS_MAX_TOKENS: u32 = 4096;

/// Errors from a persona analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The completion call failed.
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// The completion parsed but violated the analysis contract.
    #[error("invalid analysis: {0}")]
    Invalid(#[from] ValidationError),
}

/// Runs intents through a single persona and validates the result.
#[derive(Clone)]
pub struct PersonaAnalyzer {
    client: StructuredClient,
}

impl PersonaAnalyzer {
    pub fn new(client: StructuredClient) -> Self {
        Self { client }
    }

    /// One persona invocation. No internal retry beyond what the provider
    /// does; degraded-mode handling belongs to the orchestrator.
    pub async fn analyze(
        &self,
        persona: Persona,
        intent: &Intent,
    ) -> Result<AgentAnalysis, AnalysisError> {
        let request = CompletionRequest::new(analysis_prompt(intent))
            .with_system_prompt(persona.system_prompt())
            .with_max_tokens(ANALYSIS_MAX_TOKENS);

        let analysis: AgentAnalysis = self.client.complete_json(request).await?;
        analysis.validate()?;

        info!(
            persona = %persona,
            recommended = %analysis.recommended_option,
            "persona analysis complete"
        );
        Ok(analysis)
    }
}

fn analysis_prompt(intent: &Intent) -> String {
    format!(
        r#"INTENT DETAILS:
Title: {title}
Description: {description}
Success Criteria: {criteria}
Projected Impact: {impact}/10

TASK: Analyze this intent and provide 3 strategic options. You MUST respond with ONLY valid JSON, no other text.

REQUIRED JSON FORMAT (copy this structure exactly):
{{
  "scenario_options": [
    {{
      "option": "A",
      "description": "Brief 2-3 sentence description",
      "pros": ["Pro 1", "Pro 2", "Pro 3"],
      "cons": ["Con 1", "Con 2", "Con 3"],
      "risk": 2,
      "impact": 8
    }},
    {{
      "option": "B",
      "description": "Brief 2-3 sentence description",
      "pros": ["Pro 1", "Pro 2", "Pro 3"],
      "cons": ["Con 1", "Con 2", "Con 3"],
      "risk": 3,
      "impact": 7
    }},
    {{
      "option": "C",
      "description": "Brief 2-3 sentence description",
      "pros": ["Pro 1", "Pro 2", "Pro 3"],
      "cons": ["Con 1", "Con 2", "Con 3"],
      "risk": 5,
      "impact": 9
    }}
  ],
  "recommended_option": "A",
  "recommendation_rationale": "One paragraph explaining why this option is best",
  "risk_assessment": "One paragraph assessing overall risks",
  "required_resources": {{
    "time": "X hours/week for Y weeks",
    "money": "$X total budget",
    "tools": ["Tool 1", "Tool 2"],
    "people": ["Role needed"]
  }},
  "task_generation_template": ["Task 1", "Task 2", "Task 3"]
}}

IMPORTANT: Respond with ONLY the JSON object above. No explanations, no markdown, just pure JSON."#,
        title = intent.title(),
        description = intent.description(),
        criteria = intent.success_criteria().unwrap_or("Not specified"),
        impact = intent.projected_impact(),
    )
}
