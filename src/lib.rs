//! Intent Counsel - Adversarial Decision Intelligence Core
//!
//! Routes strategic intents through opposing AI personas, reconciles their
//! disagreement into a single recommendation, and mines the human edits made
//! to that recommendation for prompt improvements and fine-tuning exports.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
