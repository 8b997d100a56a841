//! Structured completion client.
//!
//! Wraps a completion provider with JSON extraction: strips markdown code
//! fences the model sometimes wraps around its output, then deserializes
//! into the caller's type. Parse failures surface as errors; retry policy
//! belongs to the provider underneath, not here.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ports::{CompletionError, CompletionProvider, CompletionRequest};

/// Typed front-end over a raw completion provider.
#[derive(Clone)]
pub struct StructuredClient {
    provider: Arc<dyn CompletionProvider>,
}

impl StructuredClient {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Requests a completion and parses its content as JSON into `T`.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        request: CompletionRequest,
    ) -> Result<T, CompletionError> {
        let response = self.provider.complete(request).await?;
        let cleaned = strip_code_fences(&response.content);

        debug!(
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "structured completion received"
        );

        serde_json::from_str(cleaned)
            .map_err(|e| CompletionError::parse(format!("Invalid JSON in completion: {e}")))
    }

    pub fn provider(&self) -> &Arc<dyn CompletionProvider> {
        &self.provider
    }
}

/// Strips a surrounding ```json or ``` fence if present; otherwise returns
/// the trimmed input unchanged.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();

    for fence in ["```json", "```"] {
        if let Some(rest) = trimmed.strip_prefix(fence) {
            if let Some(end) = rest.find("```") {
                return rest[..end].trim();
            }
            return rest.trim();
        }
    }

    trimmed
}
