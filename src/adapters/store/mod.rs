//! Storage adapters for training records.

mod in_memory;

pub use in_memory::InMemoryTrainingStore;
