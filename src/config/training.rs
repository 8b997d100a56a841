//! Training pipeline configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Thresholds for settlement mining and fine-tuning export.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Minimum acceptance rate for a record to qualify for export (0-1)
    #[serde(default = "default_min_acceptance")]
    pub min_acceptance_rate: f64,

    /// Fraction of records an n-gram must appear in to count as a pattern
    #[serde(default = "default_pattern_frequency")]
    pub min_pattern_frequency: f64,

    /// Fraction of records a structure change must appear in to flag a tone shift
    #[serde(default = "default_structure_threshold")]
    pub structure_shift_threshold: f64,

    /// Average character delta beyond which a length shift is flagged
    #[serde(default = "default_length_threshold")]
    pub length_shift_threshold: i64,
}

impl TrainingConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.min_acceptance_rate) {
            return Err(ValidationError::RateOutOfRange("min_acceptance_rate"));
        }
        if !(0.0..=1.0).contains(&self.min_pattern_frequency) {
            return Err(ValidationError::RateOutOfRange("min_pattern_frequency"));
        }
        if !(0.0..=1.0).contains(&self.structure_shift_threshold) {
            return Err(ValidationError::RateOutOfRange("structure_shift_threshold"));
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            min_acceptance_rate: default_min_acceptance(),
            min_pattern_frequency: default_pattern_frequency(),
            structure_shift_threshold: default_structure_threshold(),
            length_shift_threshold: default_length_threshold(),
        }
    }
}

fn default_min_acceptance() -> f64 {
    0.7
}

fn default_pattern_frequency() -> f64 {
    0.2
}

fn default_structure_threshold() -> f64 {
    0.3
}

fn default_length_threshold() -> i64 {
    100
}
