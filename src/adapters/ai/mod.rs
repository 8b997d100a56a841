//! AI provider adapters implementing the completion port.

mod anthropic;
mod mock;

pub use anthropic::{AnthropicConfig, AnthropicProvider};
pub use mock::{MockCompletionProvider, MockError, MockResponse};
