//! Ports - trait interfaces between the application core and the outside.
//!
//! Adapters implement these traits; application services depend only on the
//! traits, never on a concrete provider or store.

pub mod completion;
pub mod training_store;

pub use completion::{
    CompletionError, CompletionProvider, CompletionRequest, CompletionResponse, FinishReason,
    ProviderInfo, TokenUsage,
};
pub use training_store::{RecordFilter, StoreError, TrainingRecordStore};
