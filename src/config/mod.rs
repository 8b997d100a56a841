//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `INTENT_COUNSEL` prefix and nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use intent_counsel::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod training;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use training::TrainingConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Completion service configuration (Anthropic)
    #[serde(default)]
    pub ai: AiConfig,

    /// Training pipeline thresholds
    #[serde(default)]
    pub training: TrainingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file if present, then reads environment variables with
    /// the `INTENT_COUNSEL` prefix, e.g.
    /// `INTENT_COUNSEL__AI__ANTHROPIC_API_KEY=sk-ant-...` ->
    /// `ai.anthropic_api_key`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("INTENT_COUNSEL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.training.validate()?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ai: AiConfig::default(),
            training: TrainingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sections() {
        let config = AppConfig::default();
        assert_eq!(config.ai.max_retries, 3);
        assert!(config.training.min_acceptance_rate > 0.0);
    }

    #[test]
    fn default_config_fails_validation_without_key() {
        // No API key configured: the ai section must reject.
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }
}
