//! Structured output of one persona invocation.
//!
//! These shapes double as the wire contract for persona completions: field
//! names (via serde renames) match the JSON the prompt demands. Validation
//! happens once, at the parse boundary; an `AgentAnalysis` that exists is
//! always internally consistent.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::foundation::ValidationError;

/// One alternative within an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOption {
    /// Single letter or short token, unique within the parent analysis.
    #[serde(rename = "option")]
    pub label: String,
    pub description: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    /// 1 (negligible) to 5 (severe).
    pub risk: u8,
    /// 1 (marginal) to 10 (transformative).
    pub impact: u8,
}

impl ScenarioOption {
    /// Check declared bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.label.trim().is_empty() {
            return Err(ValidationError::empty_field("option"));
        }
        if !(1..=5).contains(&self.risk) {
            return Err(ValidationError::out_of_range("risk", 1, 5, self.risk as i32));
        }
        if !(1..=10).contains(&self.impact) {
            return Err(ValidationError::out_of_range(
                "impact",
                1,
                10,
                self.impact as i32,
            ));
        }
        Ok(())
    }
}

/// Resource requirements called out by an analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceRequirements {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub money: Option<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub people: Vec<String>,
}

/// The structured output of one persona invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAnalysis {
    #[serde(rename = "scenario_options")]
    pub options: Vec<ScenarioOption>,
    pub recommended_option: String,
    #[serde(rename = "recommendation_rationale")]
    pub rationale: String,
    pub risk_assessment: String,
    #[serde(rename = "required_resources", default)]
    pub resources: ResourceRequirements,
    #[serde(rename = "task_generation_template", default)]
    pub follow_up_tasks: Vec<String>,
}

impl AgentAnalysis {
    /// Validate all invariants: option bounds, unique labels, and a
    /// recommendation that points at a real option.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.options.is_empty() {
            return Err(ValidationError::empty_field("scenario_options"));
        }

        let mut seen = HashSet::new();
        for option in &self.options {
            option.validate()?;
            if !seen.insert(option.label.as_str()) {
                return Err(ValidationError::DuplicateLabel {
                    label: option.label.clone(),
                });
            }
        }

        if !seen.contains(self.recommended_option.as_str()) {
            return Err(ValidationError::UnknownRecommendation {
                label: self.recommended_option.clone(),
            });
        }

        Ok(())
    }

    /// The option the analysis recommends.
    pub fn recommended(&self) -> Option<&ScenarioOption> {
        self.options
            .iter()
            .find(|o| o.label == self.recommended_option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn option(label: &str, risk: u8, impact: u8) -> ScenarioOption {
        ScenarioOption {
            label: label.to_string(),
            description: format!("Option {label}"),
            pros: vec!["upside".to_string()],
            cons: vec!["downside".to_string()],
            risk,
            impact,
        }
    }

    fn analysis(recommended: &str) -> AgentAnalysis {
        AgentAnalysis {
            options: vec![option("A", 2, 8), option("B", 3, 7), option("C", 5, 9)],
            recommended_option: recommended.to_string(),
            rationale: "A balances upside and risk".to_string(),
            risk_assessment: "Moderate overall".to_string(),
            resources: ResourceRequirements::default(),
            follow_up_tasks: vec!["Draft plan".to_string()],
        }
    }

    #[test]
    fn valid_analysis_passes() {
        assert!(analysis("A").validate().is_ok());
    }

    #[test]
    fn recommendation_must_match_an_option() {
        let err = analysis("Z").validate().unwrap_err();
        assert!(matches!(err, ValidationError::UnknownRecommendation { .. }));
    }

    #[test]
    fn duplicate_labels_rejected() {
        let mut a = analysis("A");
        a.options.push(option("A", 1, 1));
        assert!(matches!(
            a.validate(),
            Err(ValidationError::DuplicateLabel { .. })
        ));
    }

    #[test]
    fn risk_out_of_bounds_rejected() {
        let mut a = analysis("A");
        a.options[0].risk = 6;
        assert!(matches!(
            a.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn impact_out_of_bounds_rejected() {
        let bad = option("A", 2, 11);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn empty_options_rejected() {
        let mut a = analysis("A");
        a.options.clear();
        assert!(matches!(a.validate(), Err(ValidationError::EmptyField { .. })));
    }

    #[test]
    fn recommended_returns_the_matching_option() {
        let a = analysis("B");
        assert_eq!(a.recommended().unwrap().label, "B");
    }

    #[test]
    fn wire_field_names_match_prompt_contract() {
        let json = serde_json::to_value(analysis("A")).unwrap();
        assert!(json.get("scenario_options").is_some());
        assert!(json.get("recommendation_rationale").is_some());
        assert!(json.get("required_resources").is_some());
        assert!(json.get("task_generation_template").is_some());
        assert!(json["scenario_options"][0].get("option").is_some());
    }

    #[test]
    fn missing_optional_wire_fields_default() {
        let json = r#"{
            "scenario_options": [
                {"option": "A", "description": "d", "pros": [], "cons": [], "risk": 1, "impact": 1}
            ],
            "recommended_option": "A",
            "recommendation_rationale": "r",
            "risk_assessment": "ra"
        }"#;
        let parsed: AgentAnalysis = serde_json::from_str(json).unwrap();
        assert!(parsed.validate().is_ok());
        assert!(parsed.follow_up_tasks.is_empty());
        assert_eq!(parsed.resources, ResourceRequirements::default());
    }
}
