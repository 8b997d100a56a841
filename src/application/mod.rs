//! Application layer - services orchestrating domain logic through ports.

pub mod analytics;
pub mod analyzer;
pub mod classifier;
pub mod dialectic;
pub mod settlement;
pub mod structured;

pub use analytics::{AnalyticsError, TrainingAnalytics};
pub use analyzer::{AnalysisError, PersonaAnalyzer};
pub use classifier::IntentClassifier;
pub use dialectic::DialecticOrchestrator;
pub use settlement::SettlementLogger;
pub use structured::StructuredClient;
