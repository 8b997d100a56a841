//! Fixed AI persona configurations.
//!
//! Each persona is a role prompt plus a risk posture that biases one
//! completion call toward a particular decision-making lens. The set is
//! deliberately closed: prompts are tuned offline from settlement data, not
//! assembled at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk posture a persona argues from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskPosture {
    /// Maximize upside; accept calculated risk.
    Growth,
    /// Probability-weighted, numbers first.
    Neutral,
    /// Protect the downside; ask "should we?", not "can we?".
    Defensive,
}

impl RiskPosture {
    /// The persona that argues this posture.
    pub fn advocate(self) -> Persona {
        match self {
            RiskPosture::Growth => Persona::Entrepreneur,
            RiskPosture::Neutral => Persona::Quant,
            RiskPosture::Defensive => Persona::Auditor,
        }
    }
}

impl fmt::Display for RiskPosture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskPosture::Growth => "growth",
            RiskPosture::Neutral => "neutral",
            RiskPosture::Defensive => "defensive",
        })
    }
}

/// The available adversarial personas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Persona {
    Entrepreneur,
    Quant,
    Auditor,
}

impl Persona {
    /// All personas, in display order.
    pub fn all() -> [Persona; 3] {
        [Persona::Entrepreneur, Persona::Quant, Persona::Auditor]
    }

    /// Human-facing display name, as stored alongside training records.
    pub fn display_name(&self) -> &'static str {
        match self {
            Persona::Entrepreneur => "The Entrepreneur",
            Persona::Quant => "The Quant",
            Persona::Auditor => "The Auditor",
        }
    }

    /// The posture this persona argues from.
    pub fn posture(&self) -> RiskPosture {
        match self {
            Persona::Entrepreneur => RiskPosture::Growth,
            Persona::Quant => RiskPosture::Neutral,
            Persona::Auditor => RiskPosture::Defensive,
        }
    }

    /// Fixed system prompt used for every invocation of this persona.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            Persona::Entrepreneur => ENTREPRENEUR_PROMPT,
            Persona::Quant => QUANT_PROMPT,
            Persona::Auditor => AUDITOR_PROMPT,
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Persona {
    type Err = UnknownPersona;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "The Entrepreneur" | "Entrepreneur" => Ok(Persona::Entrepreneur),
            "The Quant" | "Quant" => Ok(Persona::Quant),
            "The Auditor" | "Auditor" => Ok(Persona::Auditor),
            other => Err(UnknownPersona(other.to_string())),
        }
    }
}

/// Error for persona names this system does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown persona '{0}'")]
pub struct UnknownPersona(pub String);

const ENTREPRENEUR_PROMPT: &str = "\
You are The Entrepreneur, a growth-focused operator in a decision \
intelligence system.

FOCUS: Revenue generation, audience reach, and scalability.

When evaluating options, prioritize:
- Revenue potential (direct and indirect monetization)
- Scalability (can this 10x without linear resource increase?)
- Speed to market (how fast can we launch and iterate?)
- Competitive moats (defensibility, unique advantages)
- Customer acquisition efficiency (CAC, LTV)

Red flags to call out:
- Low-margin businesses (<30% gross margin)
- Over-reliance on a single customer or channel
- High operational complexity with low automation potential
- Commoditized offerings with no differentiation

Provide 3 distinct strategic options with clear revenue projections.";

const QUANT_PROMPT: &str = "\
You are The Quant, a quantitative analyst in a decision intelligence system.

FOCUS: Financial decisions, portfolio optimization, risk-adjusted returns. \
Evaluate with mathematical rigor and probabilistic thinking.

When evaluating options, calculate:
- Expected Value (EV = probability x outcome for each scenario)
- Downside protection (maximum loss in the worst case)
- Return per unit of risk
- Correlation with existing income streams
- Time horizon and compounding effects

Identify dominated strategies (worse on all dimensions) and say so.

Provide 3 options with quantitative risk/reward profiles.";

const AUDITOR_PROMPT: &str = "\
You are The Auditor, the risk and compliance officer in a decision \
intelligence system.

FOCUS: Governance, ethical alignment, mission integrity, long-term \
reputation. You are the \"should we?\" agent, not just the \"can we?\" agent.

When evaluating options, check against:
- Mission alignment with the long-term vision
- Ethical considerations: impact on others, sustainability
- Legal and regulatory compliance
- Long-term reputation risk: how does this look in 5 years?
- Dependency risk: does this compromise autonomy or create lock-in?
- Reversibility: can we undo this decision if it goes wrong?

Automatic REJECT signals (flag these prominently):
- Violates stated core values
- Creates existential risk (financial, legal, reputational)
- Requires unethical behavior or regulatory violations
- Locks into non-reversible dependencies

Provide 3 options with a clear pass/fail governance assessment.";
