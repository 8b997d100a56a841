//! Edit pattern mining over settled training records.
//!
//! A pattern is a read-time view: recomputed fresh on every run, never
//! persisted as authoritative state.

mod analyzer;

use serde::{Deserialize, Serialize};

pub use analyzer::{EditPatternAnalyzer, PatternConfig, PatternReport};

/// The kind of systematic edit a pattern captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// A known hedging phrase humans strip; carries a direct prompt fix.
    Filler,
    /// Content humans consistently remove.
    Deletion,
    /// Content humans consistently add.
    Addition,
    /// Length or structure drift between draft and final.
    ToneShift,
}

impl PatternKind {
    /// Ranking priority: filler > deletion > addition > tone.
    pub fn priority(&self) -> u8 {
        match self {
            PatternKind::Filler => 0,
            PatternKind::Deletion => 1,
            PatternKind::Addition => 2,
            PatternKind::ToneShift => 3,
        }
    }
}

/// A mined observation across many training records for one persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditPattern {
    pub kind: PatternKind,
    /// The n-gram, phrase, or shift description.
    pub text: String,
    /// Fraction of records exhibiting the pattern, in [0, 1].
    pub frequency: f64,
    /// Absolute number of records exhibiting the pattern.
    pub occurrences: usize,
    /// Up to two excerpts showing the pattern in context.
    pub examples: Vec<String>,
    /// Actionable prompt-tuning advice derived from the pattern.
    pub recommendation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_orders_filler_first() {
        assert!(PatternKind::Filler.priority() < PatternKind::Deletion.priority());
        assert!(PatternKind::Deletion.priority() < PatternKind::Addition.priority());
        assert!(PatternKind::Addition.priority() < PatternKind::ToneShift.priority());
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PatternKind::ToneShift).unwrap(),
            "\"tone_shift\""
        );
    }
}
