//! Fine-tuning dataset assembly from settled training records.
//!
//! Each qualifying record becomes one system/user/assistant triple; the
//! assistant turn is the human-approved final plan, never the AI draft.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::domain::foundation::IntentId;
use crate::domain::persona::Persona;
use crate::domain::settlement::TrainingRecord;

/// Minimum dataset size for a fine-tuning run to be worth starting.
pub const MIN_EXAMPLES: usize = 50;

/// System turn used when a record carries no persona.
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a strategic planning assistant. Produce a concrete, actionable plan \
     for the intent described by the user.";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize example: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One chat-format training triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinetuningExample {
    pub system: String,
    pub user: String,
    /// Pretty-printed human-approved final plan.
    pub assistant: String,
    pub source_intent_id: IntentId,
    pub acceptance_rate: f64,
}

/// Which records qualify for export.
#[derive(Debug, Clone, Default)]
pub struct ExportFilter {
    /// Records below this acceptance are noise, not signal.
    pub min_acceptance_rate: f64,
    /// Restrict to one persona's settlements.
    pub persona: Option<Persona>,
    /// Restrict to settlements at or after this instant.
    pub since: Option<DateTime<Utc>>,
}

impl ExportFilter {
    pub fn with_min_acceptance(min_acceptance_rate: f64) -> Self {
        Self {
            min_acceptance_rate,
            ..Self::default()
        }
    }

    fn matches(&self, record: &TrainingRecord) -> bool {
        record.acceptance_rate >= self.min_acceptance_rate
            && self.persona.map_or(true, |p| record.persona == Some(p))
            && self.since.map_or(true, |t| record.timestamp >= t)
    }
}

/// Outcome of validating an assembled dataset before upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetValidationReport {
    pub valid: bool,
    pub example_count: usize,
    /// Human-readable reasons the dataset failed, empty when valid.
    pub violations: Vec<String>,
}

/// Assembles, validates, and serializes fine-tuning datasets.
#[derive(Debug, Clone, Default)]
pub struct FineTuningExporter {
    /// Original intent descriptions keyed by id, used for the user turn.
    descriptions: HashMap<IntentId, String>,
}

impl FineTuningExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the original description for an intent so its exported
    /// user turn reads as the real request rather than a placeholder.
    pub fn with_description(mut self, id: IntentId, description: impl Into<String>) -> Self {
        self.descriptions.insert(id, description.into());
        self
    }

    pub fn register_description(&mut self, id: IntentId, description: impl Into<String>) {
        self.descriptions.insert(id, description.into());
    }

    /// Builds triples from every record passing the filter.
    pub fn build_examples(
        &self,
        records: &[TrainingRecord],
        filter: &ExportFilter,
    ) -> Result<Vec<FinetuningExample>, ExportError> {
        let mut examples = Vec::new();
        for record in records.iter().filter(|r| filter.matches(r)) {
            let system = record
                .persona
                .map(|p| p.system_prompt().to_string())
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());
            let user = self
                .descriptions
                .get(&record.intent_id)
                .cloned()
                .unwrap_or_else(|| {
                    format!("Analyze this strategic intent (ID: {})", record.intent_id)
                });
            let assistant = serde_json::to_string_pretty(&record.final_plan)?;

            examples.push(FinetuningExample {
                system,
                user,
                assistant,
                source_intent_id: record.intent_id,
                acceptance_rate: record.acceptance_rate,
            });
        }
        Ok(examples)
    }

    /// Checks the assembled dataset against upload requirements. The source
    /// records are consulted to catch an assistant turn that reproduces a
    /// draft the human actually rewrote, which would mean the diff upstream
    /// malfunctioned.
    pub fn validate(
        &self,
        examples: &[FinetuningExample],
        records: &[TrainingRecord],
    ) -> DatasetValidationReport {
        let mut violations = Vec::new();

        if examples.len() < MIN_EXAMPLES {
            violations.push(format!(
                "dataset has {} examples, below the minimum of {MIN_EXAMPLES}",
                examples.len()
            ));
        }

        let by_id: HashMap<IntentId, &TrainingRecord> =
            records.iter().map(|r| (r.intent_id, r)).collect();

        for (i, example) in examples.iter().enumerate() {
            if example.system.trim().is_empty() {
                violations.push(format!("example {i}: empty system turn"));
            }
            if example.user.trim().is_empty() {
                violations.push(format!("example {i}: empty user turn"));
            }
            if example.assistant.trim().is_empty() {
                violations.push(format!("example {i}: empty assistant turn"));
            }

            if let Some(record) = by_id.get(&example.source_intent_id) {
                if record.was_edited() {
                    if let Ok(draft) = serde_json::to_string_pretty(&record.original_plan) {
                        if example.assistant == draft {
                            violations.push(format!(
                                "example {i}: assistant turn reproduces the rejected draft \
                                 for intent {}",
                                example.source_intent_id
                            ));
                        }
                    }
                }
            }
        }

        DatasetValidationReport {
            valid: violations.is_empty(),
            example_count: examples.len(),
            violations,
        }
    }

    /// Serializes examples to chat-format JSONL, one object per line.
    pub fn to_jsonl(&self, examples: &[FinetuningExample]) -> Result<String, ExportError> {
        let mut lines = Vec::with_capacity(examples.len());
        for example in examples {
            let line = json!({
                "messages": [
                    { "role": "system", "content": example.system },
                    { "role": "user", "content": example.user },
                    { "role": "assistant", "content": example.assistant },
                ]
            });
            lines.push(serde_json::to_string(&line)?);
        }
        Ok(lines.join("\n"))
    }

    /// Writes the dataset to disk, trailing newline included.
    pub fn write_jsonl(
        &self,
        examples: &[FinetuningExample],
        path: &Path,
    ) -> Result<(), ExportError> {
        let mut body = self.to_jsonl(examples)?;
        body.push('\n');
        fs::write(path, body)?;
        Ok(())
    }
}
