//! Settlement: the moment a human finalizes an AI-produced plan.
//!
//! The diff engine compares the plan snapshot taken at analysis time against
//! the snapshot taken at approval time; the resulting `TrainingRecord` is
//! the write-once ground truth every downstream miner reads.

mod diff;
mod record;

pub use diff::{diff_plans, PlanDiff};
pub use record::TrainingRecord;
