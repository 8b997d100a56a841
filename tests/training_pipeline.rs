//! Settlement-to-export pipeline: settle, aggregate, mine, export.

use std::sync::Arc;

use serde_json::json;

use intent_counsel::adapters::store::InMemoryTrainingStore;
use intent_counsel::application::{SettlementLogger, TrainingAnalytics};
use intent_counsel::config::TrainingConfig;
use intent_counsel::domain::export::{ExportFilter, FineTuningExporter};
use intent_counsel::domain::foundation::IntentId;
use intent_counsel::domain::patterns::PatternKind;
use intent_counsel::domain::persona::Persona;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn pipeline() -> (SettlementLogger, TrainingAnalytics) {
    let store = Arc::new(InMemoryTrainingStore::new());
    (
        SettlementLogger::new(store.clone()),
        TrainingAnalytics::new(store, TrainingConfig::default()),
    )
}

/// A draft plan with a recurring hedge the human always strips.
fn draft(i: usize) -> serde_json::Value {
    json!({
        "summary": format!("let me analyze the aggressive rollout plan number {i}"),
        "tasks": ["research vendors", "negotiate pricing", "sign contract"],
    })
}

fn approved(i: usize) -> serde_json::Value {
    json!({
        "summary": format!("rollout plan number {i}"),
        "tasks": ["research vendors", "negotiate pricing", "sign contract"],
    })
}

#[tokio::test]
async fn settlements_feed_metrics_mining_and_export() {
    init_tracing();
    let (logger, analytics) = pipeline();

    for i in 0..6 {
        logger
            .settle(IntentId::new(), Some(Persona::Entrepreneur), draft(i), approved(i))
            .await
            .unwrap();
    }
    // One untouched settlement from another persona.
    let clean = json!({"summary": "renew as drafted"});
    logger
        .settle(IntentId::new(), Some(Persona::Quant), clean.clone(), clean)
        .await
        .unwrap();

    // Metrics.
    let summary = analytics.performance_summary(None).await.unwrap();
    assert_eq!(summary.total_settlements, 7);
    let entrepreneur = summary.for_persona(Persona::Entrepreneur).unwrap();
    assert_eq!(entrepreneur.settlements, 6);
    assert_eq!(entrepreneur.edited, 6);
    let quant = summary.for_persona(Persona::Quant).unwrap();
    assert_eq!(quant.avg_acceptance, 1.0);

    // Mining: the hedge the human always strips must surface as filler.
    let report = analytics
        .improvement_opportunities(Persona::Entrepreneur, None)
        .await
        .unwrap();
    assert_eq!(report.records_analyzed, 6);
    let filler = report
        .patterns
        .iter()
        .find(|p| p.kind == PatternKind::Filler)
        .expect("recurring hedge should surface as a filler pattern");
    assert_eq!(filler.text, "let me analyze");
    assert_eq!(filler.occurrences, 6);
    assert!(filler.recommendation.contains("filler"));

    // Mining twice over the same store yields identical output.
    let again = analytics
        .improvement_opportunities(Persona::Entrepreneur, None)
        .await
        .unwrap();
    assert_eq!(report, again);

    // Comparison: the untouched quant settlement wins on acceptance.
    let cmp = analytics
        .compare(Persona::Quant, Persona::Entrepreneur)
        .await
        .unwrap();
    assert_eq!(cmp.winner, Some(Persona::Quant));
}

#[tokio::test]
async fn export_filters_by_acceptance_and_names_the_shortfall() {
    init_tracing();
    let (logger, analytics) = pipeline();

    // 10 clean settlements qualify; 50 heavily edited ones do not.
    for i in 0..10 {
        let plan = json!({"summary": format!("approved plan {i}")});
        logger
            .settle(IntentId::new(), Some(Persona::Auditor), plan.clone(), plan)
            .await
            .unwrap();
    }
    for i in 0..50 {
        logger
            .settle(
                IntentId::new(),
                Some(Persona::Auditor),
                json!({"summary": format!("original text {i}")}),
                json!({"summary": format!("entirely rewritten by hand {i}")}),
            )
            .await
            .unwrap();
    }

    let exporter = FineTuningExporter::new();
    let filter = ExportFilter::with_min_acceptance(0.9);
    let (examples, report) = analytics.build_dataset(&exporter, &filter).await.unwrap();

    assert_eq!(examples.len(), 10);
    assert!(!report.valid);
    assert!(report.violations[0].contains("10 examples"));

    // Every exported assistant turn is a final plan, never a draft.
    for example in &examples {
        assert!(example.assistant.contains("approved plan"));
        assert!(example.acceptance_rate >= 0.9);
    }
}

#[tokio::test]
async fn export_writes_jsonl_with_persona_system_turns() {
    init_tracing();
    let (logger, analytics) = pipeline();

    let plan = json!({"summary": "hold the budget flat"});
    logger
        .settle(IntentId::new(), Some(Persona::Auditor), plan.clone(), plan)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("train.jsonl");
    let report = analytics
        .export_jsonl(&FineTuningExporter::new(), &path)
        .await
        .unwrap();
    assert_eq!(report.example_count, 1);

    let body = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(body.trim()).unwrap();
    let messages = parsed["messages"].as_array().unwrap();
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(
        messages[0]["content"],
        Persona::Auditor.system_prompt()
    );
    assert!(messages[2]["content"]
        .as_str()
        .unwrap()
        .contains("hold the budget flat"));
}

#[tokio::test]
async fn empty_store_yields_zero_metrics_and_advice_only_mining() {
    init_tracing();
    let (_, analytics) = pipeline();

    let summary = analytics.performance_summary(None).await.unwrap();
    assert_eq!(summary.total_settlements, 0);
    assert_eq!(summary.overall_avg_acceptance, 0.0);

    let report = analytics
        .improvement_opportunities(Persona::Quant, None)
        .await
        .unwrap();
    assert!(report.patterns.is_empty());
    assert_eq!(report.recommendations.len(), 1);

    let cmp = analytics
        .compare(Persona::Quant, Persona::Auditor)
        .await
        .unwrap();
    assert_eq!(cmp.winner, None);
}
