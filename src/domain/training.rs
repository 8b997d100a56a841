//! Aggregate acceptance metrics over settled training records.

use serde::{Deserialize, Serialize};

use crate::domain::persona::Persona;
use crate::domain::settlement::TrainingRecord;

/// Two average acceptance rates within this band of each other are a tie.
pub const COMPARISON_TIE_BAND: f64 = 0.02;

/// Acceptance statistics for a single persona's settlements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaPerformance {
    pub persona: Persona,
    pub settlements: usize,
    /// How many of those settlements the human edited at all.
    pub edited: usize,
    pub avg_acceptance: f64,
    pub min_acceptance: f64,
    pub max_acceptance: f64,
}

impl PersonaPerformance {
    /// Aggregates the records carrying this persona. Records settled without
    /// a persona are ignored here and reported only in the summary totals.
    pub fn from_records(persona: Persona, records: &[TrainingRecord]) -> Self {
        let rates: Vec<f64> = records
            .iter()
            .filter(|r| r.persona == Some(persona))
            .map(|r| r.acceptance_rate)
            .collect();
        let edited = records
            .iter()
            .filter(|r| r.persona == Some(persona) && r.was_edited())
            .count();

        if rates.is_empty() {
            return Self {
                persona,
                settlements: 0,
                edited: 0,
                avg_acceptance: 0.0,
                min_acceptance: 0.0,
                max_acceptance: 0.0,
            };
        }

        let sum: f64 = rates.iter().sum();
        let min = rates.iter().copied().fold(f64::INFINITY, f64::min);
        let max = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            persona,
            settlements: rates.len(),
            edited,
            avg_acceptance: sum / rates.len() as f64,
            min_acceptance: min,
            max_acceptance: max,
        }
    }
}

/// Snapshot of acceptance across every persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub per_persona: Vec<PersonaPerformance>,
    pub total_settlements: usize,
    /// Settlements that arrived without a persona attached.
    pub untagged: usize,
    /// Mean acceptance over every record, tagged or not. Zero on empty input.
    pub overall_avg_acceptance: f64,
}

impl PerformanceSummary {
    pub fn from_records(records: &[TrainingRecord]) -> Self {
        let per_persona = Persona::all()
            .iter()
            .map(|p| PersonaPerformance::from_records(*p, records))
            .collect();
        let untagged = records.iter().filter(|r| r.persona.is_none()).count();
        let overall_avg_acceptance = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.acceptance_rate).sum::<f64>() / records.len() as f64
        };

        Self {
            per_persona,
            total_settlements: records.len(),
            untagged,
            overall_avg_acceptance,
        }
    }

    pub fn for_persona(&self, persona: Persona) -> Option<&PersonaPerformance> {
        self.per_persona.iter().find(|p| p.persona == persona)
    }
}

/// Head-to-head comparison between two personas' average acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaComparison {
    pub first: PersonaPerformance,
    pub second: PersonaPerformance,
    /// None on a tie (averages within the tie band) or when either side has
    /// no settlements to compare.
    pub winner: Option<Persona>,
    /// Signed difference, first minus second.
    pub delta: f64,
}

impl PersonaComparison {
    pub fn between(first: Persona, second: Persona, records: &[TrainingRecord]) -> Self {
        let first = PersonaPerformance::from_records(first, records);
        let second = PersonaPerformance::from_records(second, records);
        let delta = first.avg_acceptance - second.avg_acceptance;

        let winner = if first.settlements == 0 || second.settlements == 0 {
            None
        } else if delta.abs() <= COMPARISON_TIE_BAND {
            None
        } else if delta > 0.0 {
            Some(first.persona)
        } else {
            Some(second.persona)
        };

        Self {
            first,
            second,
            winner,
            delta,
        }
    }

    pub fn is_tie(&self) -> bool {
        self.winner.is_none() && self.first.settlements > 0 && self.second.settlements > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::IntentId;
    use crate::domain::settlement::diff_plans;
    use chrono::Utc;
    use serde_json::json;

    fn record(persona: Option<Persona>, rate: f64) -> TrainingRecord {
        // Derive a plan pair producing the requested acceptance out of 10 leaves.
        let kept = (rate * 10.0).round() as usize;
        let original: Vec<serde_json::Value> = (0..10).map(|i| json!(format!("v{i}"))).collect();
        let final_plan: Vec<serde_json::Value> = (0..10)
            .map(|i| {
                if i < kept {
                    json!(format!("v{i}"))
                } else {
                    json!(format!("replacement-{i}"))
                }
            })
            .collect();
        let original = json!({ "items": original });
        let final_plan = json!({ "items": final_plan });
        let diff = diff_plans(&original, &final_plan);
        TrainingRecord::from_diff(IntentId::new(), Utc::now(), persona, original, final_plan, diff)
    }

    #[test]
    fn performance_aggregates_only_the_requested_persona() {
        let records = vec![
            record(Some(Persona::Entrepreneur), 0.8),
            record(Some(Persona::Entrepreneur), 0.6),
            record(Some(Persona::Auditor), 0.2),
        ];

        let perf = PersonaPerformance::from_records(Persona::Entrepreneur, &records);

        assert_eq!(perf.settlements, 2);
        assert!((perf.avg_acceptance - 0.7).abs() < 1e-9);
        assert!((perf.min_acceptance - 0.6).abs() < 1e-9);
        assert!((perf.max_acceptance - 0.8).abs() < 1e-9);
    }

    #[test]
    fn zero_settlements_yields_zeroed_stats_not_nan() {
        let perf = PersonaPerformance::from_records(Persona::Quant, &[]);
        assert_eq!(perf.settlements, 0);
        assert_eq!(perf.avg_acceptance, 0.0);
        assert!(!perf.avg_acceptance.is_nan());
    }

    #[test]
    fn summary_counts_untagged_records() {
        let records = vec![record(None, 1.0), record(Some(Persona::Quant), 0.5)];
        let summary = PerformanceSummary::from_records(&records);

        assert_eq!(summary.total_settlements, 2);
        assert_eq!(summary.untagged, 1);
        assert!((summary.overall_avg_acceptance - 0.75).abs() < 1e-9);
        assert_eq!(summary.per_persona.len(), Persona::all().len());
    }

    #[test]
    fn empty_summary_is_zero_safe() {
        let summary = PerformanceSummary::from_records(&[]);
        assert_eq!(summary.total_settlements, 0);
        assert_eq!(summary.overall_avg_acceptance, 0.0);
    }

    #[test]
    fn comparison_picks_the_clearly_better_persona() {
        let records = vec![
            record(Some(Persona::Entrepreneur), 0.9),
            record(Some(Persona::Auditor), 0.4),
        ];

        let cmp = PersonaComparison::between(Persona::Entrepreneur, Persona::Auditor, &records);
        assert_eq!(cmp.winner, Some(Persona::Entrepreneur));
        assert!(cmp.delta > 0.0);
    }

    #[test]
    fn near_equal_averages_are_a_tie() {
        let records = vec![
            record(Some(Persona::Entrepreneur), 0.8),
            record(Some(Persona::Auditor), 0.8),
        ];

        let cmp = PersonaComparison::between(Persona::Entrepreneur, Persona::Auditor, &records);
        assert!(cmp.is_tie());
        assert_eq!(cmp.winner, None);
    }

    #[test]
    fn one_sided_data_produces_no_winner() {
        let records = vec![record(Some(Persona::Quant), 0.9)];
        let cmp = PersonaComparison::between(Persona::Quant, Persona::Auditor, &records);
        assert_eq!(cmp.winner, None);
        assert!(!cmp.is_tie());
    }
}
