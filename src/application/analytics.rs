//! Read-side analytics over the training store.
//!
//! All operations take a snapshot through the store port and compute from
//! it; nothing here writes back, so concurrent settlements can only add
//! records a given snapshot never sees.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::config::TrainingConfig;
use crate::domain::export::{
    DatasetValidationReport, ExportError, ExportFilter, FineTuningExporter, FinetuningExample,
};
use crate::domain::patterns::{EditPatternAnalyzer, PatternConfig, PatternReport};
use crate::domain::persona::Persona;
use crate::domain::training::{PersonaComparison, PerformanceSummary};
use crate::ports::{RecordFilter, StoreError, TrainingRecordStore};

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Aggregate metrics, pattern mining, and dataset export over settlements.
#[derive(Clone)]
pub struct TrainingAnalytics {
    store: Arc<dyn TrainingRecordStore>,
    analyzer: EditPatternAnalyzer,
    config: TrainingConfig,
}

impl TrainingAnalytics {
    pub fn new(store: Arc<dyn TrainingRecordStore>, config: TrainingConfig) -> Self {
        let analyzer = EditPatternAnalyzer::new(PatternConfig {
            min_frequency: config.min_pattern_frequency,
            structure_shift_threshold: config.structure_shift_threshold,
            length_shift_threshold: config.length_shift_threshold,
            ..PatternConfig::default()
        });
        Self {
            store,
            analyzer,
            config,
        }
    }

    /// Acceptance statistics across all personas, optionally windowed.
    pub async fn performance_summary(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<PerformanceSummary, AnalyticsError> {
        let mut filter = RecordFilter::all();
        filter.since = since;
        let records = self.store.snapshot(&filter).await?;
        Ok(PerformanceSummary::from_records(&records))
    }

    /// Mines one persona's settlements for recurring edit patterns,
    /// optionally windowed to recent records.
    pub async fn improvement_opportunities(
        &self,
        persona: Persona,
        since: Option<DateTime<Utc>>,
    ) -> Result<PatternReport, AnalyticsError> {
        let mut filter = RecordFilter::for_persona(persona);
        filter.since = since;
        let records = self.store.snapshot(&filter).await?;
        let report = self.analyzer.analyze(&records);
        info!(
            persona = %persona,
            patterns = report.patterns.len(),
            records = report.records_analyzed,
            "pattern mining complete"
        );
        Ok(report)
    }

    /// Head-to-head acceptance comparison between two personas.
    pub async fn compare(
        &self,
        first: Persona,
        second: Persona,
    ) -> Result<PersonaComparison, AnalyticsError> {
        let records = self.store.snapshot(&RecordFilter::all()).await?;
        Ok(PersonaComparison::between(first, second, &records))
    }

    /// Builds and validates a fine-tuning dataset from qualifying records.
    pub async fn build_dataset(
        &self,
        exporter: &FineTuningExporter,
        filter: &ExportFilter,
    ) -> Result<(Vec<FinetuningExample>, DatasetValidationReport), AnalyticsError> {
        let mut record_filter = RecordFilter::all();
        record_filter.persona = filter.persona;
        record_filter.since = filter.since;

        let records = self.store.snapshot(&record_filter).await?;
        let examples = exporter.build_examples(&records, filter)?;
        let report = exporter.validate(&examples, &records);

        info!(
            examples = examples.len(),
            valid = report.valid,
            "fine-tuning dataset assembled"
        );
        Ok((examples, report))
    }

    /// Exports qualifying records straight to a JSONL file. The dataset is
    /// written even when validation fails; the report says whether it is
    /// worth uploading.
    pub async fn export_jsonl(
        &self,
        exporter: &FineTuningExporter,
        path: &Path,
    ) -> Result<DatasetValidationReport, AnalyticsError> {
        let filter = ExportFilter::with_min_acceptance(self.config.min_acceptance_rate);
        let (examples, report) = self.build_dataset(exporter, &filter).await?;
        exporter.write_jsonl(&examples, path)?;
        Ok(report)
    }
}
