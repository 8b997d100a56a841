//! Foundation value objects shared across the domain.

mod errors;
mod ids;

pub use errors::ValidationError;
pub use ids::IntentId;
