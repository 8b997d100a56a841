//! Lightweight string mining over settlement corpora.
//!
//! No NLP model: overlapping word n-grams (2-4 words) compared between the
//! original and final plan text, a fixed filler-phrase table, and coarse
//! length/structure signals. Runs over an immutable snapshot and performs
//! no writes, so repeated runs over the same records yield identical output.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use once_cell::sync::Lazy;
use serde_json::Value;

use super::{EditPattern, PatternKind};
use crate::domain::settlement::TrainingRecord;

/// Hedging phrases humans routinely strip from AI output. Scored separately
/// from general deletions because each carries a direct prompt fix.
const DEFAULT_FILLER_PHRASES: &[&str] = &[
    "let me analyze",
    "let me think",
    "i need to consider",
    "it's important to note",
    "it should be noted",
    "as an ai",
    "great question",
    "i hope this helps",
    "feel free to",
    "please note that",
    "in conclusion",
    "to summarize",
    "in summary",
];

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "with", "from", "this", "that", "are", "was", "were", "has", "have",
        "had", "not", "but", "its", "his", "her", "you", "your", "will", "can", "into", "than",
        "then", "out", "all", "any",
    ]
    .into_iter()
    .collect()
});

const NGRAM_MIN: usize = 2;
const NGRAM_MAX: usize = 4;
const MAX_EXAMPLES: usize = 2;

/// Tunable thresholds for pattern mining.
#[derive(Debug, Clone)]
pub struct PatternConfig {
    /// Fraction of records an n-gram must appear in to surface.
    pub min_frequency: f64,
    /// Absolute floor on occurrences.
    pub min_count: usize,
    /// Cap on surfaced patterns per kind.
    pub max_patterns: usize,
    /// Fraction of records a structure change must reach to flag a shift.
    pub structure_shift_threshold: f64,
    /// Average character delta beyond which a length shift is flagged.
    pub length_shift_threshold: i64,
    /// Filler phrases to score; lowercase.
    pub filler_phrases: Vec<String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_frequency: 0.2,
            min_count: 2,
            max_patterns: 20,
            structure_shift_threshold: 0.3,
            length_shift_threshold: 100,
            filler_phrases: DEFAULT_FILLER_PHRASES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Ranked patterns plus synthesized prompt-change recommendations.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternReport {
    /// Patterns ranked by frequency descending, then kind priority.
    pub patterns: Vec<EditPattern>,
    pub recommendations: Vec<String>,
    pub records_analyzed: usize,
}

/// Mines recurring edit patterns from one persona's settlement records.
#[derive(Debug, Clone, Default)]
pub struct EditPatternAnalyzer {
    config: PatternConfig,
}

impl EditPatternAnalyzer {
    pub fn new(config: PatternConfig) -> Self {
        Self { config }
    }

    /// Run the full analysis over an immutable record snapshot.
    pub fn analyze(&self, records: &[TrainingRecord]) -> PatternReport {
        if records.is_empty() {
            return PatternReport {
                patterns: Vec::new(),
                recommendations: vec![
                    "No settlements to analyze. Collect more before drawing conclusions."
                        .to_string(),
                ],
                records_analyzed: 0,
            };
        }

        let texts: Vec<(String, String)> = records
            .iter()
            .map(|r| (plan_text(&r.original_plan), plan_text(&r.final_plan)))
            .collect();

        let mut patterns = Vec::new();
        patterns.extend(self.filler_patterns(&texts));
        patterns.extend(self.ngram_patterns(&texts, PatternKind::Deletion));
        patterns.extend(self.ngram_patterns(&texts, PatternKind::Addition));
        patterns.extend(self.tone_patterns(&texts));

        rank(&mut patterns);

        let recommendations = self.recommendations(&patterns);

        PatternReport {
            patterns,
            recommendations,
            records_analyzed: records.len(),
        }
    }

    /// N-grams present on one side only, aggregated across records.
    fn ngram_patterns(&self, texts: &[(String, String)], kind: PatternKind) -> Vec<EditPattern> {
        let total = texts.len();
        // BTreeMap keeps iteration (and therefore tie-breaks) deterministic.
        let mut counts: BTreeMap<String, (usize, Vec<String>)> = BTreeMap::new();

        for (original, final_text) in texts {
            let (source, other) = match kind {
                PatternKind::Deletion => (original, final_text),
                PatternKind::Addition => (final_text, original),
                _ => unreachable!("ngram mining only handles deletion/addition"),
            };
            let source_grams = ngrams(source);
            let other_grams = ngrams(other);

            for gram in source_grams.difference(&other_grams) {
                if self.is_filler(gram) {
                    continue; // reported as a filler pattern instead
                }
                let entry = counts.entry(gram.clone()).or_default();
                entry.0 += 1;
                if entry.1.len() < MAX_EXAMPLES {
                    entry.1.push(excerpt(source, gram));
                }
            }
        }

        let recommendation = |text: &str| match kind {
            PatternKind::Deletion => {
                format!("Humans consistently remove '{text}'; cut it from the persona prompt output")
            }
            _ => format!("Humans consistently add '{text}'; cover it in the persona prompt"),
        };

        self.collect_frequent(counts, total, kind, recommendation)
    }

    /// Known hedging phrases present in the draft but stripped from the final.
    fn filler_patterns(&self, texts: &[(String, String)]) -> Vec<EditPattern> {
        let total = texts.len();
        let mut counts: BTreeMap<String, (usize, Vec<String>)> = BTreeMap::new();

        for (original, final_text) in texts {
            for phrase in &self.config.filler_phrases {
                if original.contains(phrase.as_str()) && !final_text.contains(phrase.as_str()) {
                    let entry = counts.entry(phrase.clone()).or_default();
                    entry.0 += 1;
                    if entry.1.len() < MAX_EXAMPLES {
                        entry.1.push(excerpt(original, phrase));
                    }
                }
            }
        }

        self.collect_frequent(counts, total, PatternKind::Filler, |text| {
            format!("Remove filler language from the persona prompt: '{text}'")
        })
    }

    /// Length and structure drift between draft and final.
    fn tone_patterns(&self, texts: &[(String, String)]) -> Vec<EditPattern> {
        let total = texts.len();
        let mut patterns = Vec::new();

        let deltas: Vec<i64> = texts
            .iter()
            .map(|(o, f)| f.chars().count() as i64 - o.chars().count() as i64)
            .collect();
        let avg_delta = deltas.iter().sum::<i64>() / total.max(1) as i64;

        if avg_delta.abs() > self.config.length_shift_threshold {
            let shifted = deltas
                .iter()
                .filter(|d| d.signum() == avg_delta.signum())
                .count();
            let (direction, advice) = if avg_delta > 0 {
                ("expand", "Increase output length and detail")
            } else {
                ("shorten", "Make output more concise")
            };
            patterns.push(EditPattern {
                kind: PatternKind::ToneShift,
                text: format!("Humans {direction} output (avg {avg_delta:+} chars)"),
                frequency: shifted as f64 / total as f64,
                occurrences: shifted,
                examples: Vec::new(),
                recommendation: advice.to_string(),
            });
        }

        let mut structure: BTreeMap<&'static str, usize> = BTreeMap::new();
        for (original, final_text) in texts {
            let orig_bullets = bullet_lines(original);
            let final_bullets = bullet_lines(final_text);
            if final_bullets > orig_bullets + 2 {
                *structure.entry("prose to bullets").or_default() += 1;
            } else if orig_bullets > final_bullets + 2 {
                *structure.entry("bullets to prose").or_default() += 1;
            }
        }

        for (change, count) in structure {
            let frequency = count as f64 / total as f64;
            if frequency >= self.config.structure_shift_threshold {
                patterns.push(EditPattern {
                    kind: PatternKind::ToneShift,
                    text: format!("Humans restructure {change}"),
                    frequency,
                    occurrences: count,
                    examples: Vec::new(),
                    recommendation: format!("Prompt the persona to format as {change} directly"),
                });
            }
        }

        patterns
    }

    fn collect_frequent(
        &self,
        counts: BTreeMap<String, (usize, Vec<String>)>,
        total: usize,
        kind: PatternKind,
        recommendation: impl Fn(&str) -> String,
    ) -> Vec<EditPattern> {
        let mut patterns: Vec<EditPattern> = counts
            .into_iter()
            .filter(|(_, (count, _))| *count >= self.config.min_count)
            .map(|(text, (count, examples))| EditPattern {
                frequency: count as f64 / total as f64,
                occurrences: count,
                recommendation: recommendation(&text),
                kind,
                text,
                examples,
            })
            .filter(|p| p.frequency >= self.config.min_frequency)
            .collect();

        rank(&mut patterns);
        patterns.truncate(self.config.max_patterns);
        patterns
    }

    fn recommendations(&self, patterns: &[EditPattern]) -> Vec<String> {
        let mut recommendations: Vec<String> = patterns
            .iter()
            .map(|p| {
                format!(
                    "[{} {:.0}%] {}",
                    label(p.kind),
                    p.frequency * 100.0,
                    p.recommendation
                )
            })
            .collect();
        recommendations.dedup();

        if recommendations.is_empty() {
            recommendations.push(
                "No strong patterns detected. Collect more settlements (aim for 20+) before \
                 drawing conclusions."
                    .to_string(),
            );
        }
        recommendations
    }

    fn is_filler(&self, text: &str) -> bool {
        self.config.filler_phrases.iter().any(|p| p == text)
    }
}

/// Frequency descending, then kind priority, then text for a total order.
fn rank(patterns: &mut [EditPattern]) {
    patterns.sort_by(|a, b| {
        b.frequency
            .total_cmp(&a.frequency)
            .then(a.kind.priority().cmp(&b.kind.priority()))
            .then(a.text.cmp(&b.text))
    });
}

fn label(kind: PatternKind) -> &'static str {
    match kind {
        PatternKind::Filler => "Filler",
        PatternKind::Deletion => "Deletion",
        PatternKind::Addition => "Addition",
        PatternKind::ToneShift => "Tone",
    }
}

/// Flatten every string leaf of a plan into one lowercase text blob.
/// Newlines are preserved so structure markers survive.
fn plan_text(plan: &Value) -> String {
    let mut parts = Vec::new();
    collect_strings(plan, &mut parts);
    parts.join("\n").to_lowercase()
}

fn collect_strings(value: &Value, parts: &mut Vec<String>) {
    match value {
        Value::String(s) => parts.push(s.clone()),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, parts)),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, parts)),
        _ => {}
    }
}

fn tokens(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| w.len() >= 3 && !STOP_WORDS.contains(w))
        .collect()
}

/// Overlapping word n-grams, sizes 2 through 4, deduplicated per text.
fn ngrams(text: &str) -> BTreeSet<String> {
    let words = tokens(text);
    let mut grams = BTreeSet::new();
    for n in NGRAM_MIN..=NGRAM_MAX {
        for window in words.windows(n) {
            grams.insert(window.join(" "));
        }
    }
    grams
}

/// A short context window around the first occurrence of a phrase. When the
/// phrase's tokens are not contiguous in the raw text, the phrase itself is
/// the excerpt.
fn excerpt(text: &str, phrase: &str) -> String {
    let probe = phrase.split(' ').next().unwrap_or(phrase);
    match text.find(probe) {
        Some(pos) => {
            let start = text[..pos]
                .char_indices()
                .rev()
                .take(30)
                .last()
                .map(|(i, _)| i)
                .unwrap_or(pos);
            text[start..]
                .chars()
                .take(60 + phrase.len())
                .collect::<String>()
                .replace('\n', " ")
        }
        None => phrase.to_string(),
    }
}

fn bullet_lines(text: &str) -> usize {
    text.lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            trimmed.starts_with("- ")
                || trimmed.starts_with("* ")
                || trimmed.starts_with("\u{2022}")
                || numbered(trimmed)
        })
        .count()
}

fn numbered(line: &str) -> bool {
    let digits: String = line.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return false;
    }
    matches!(line[digits.len()..].chars().next(), Some('.') | Some(')'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::IntentId;
    use crate::domain::persona::Persona;
    use crate::domain::settlement::diff_plans;
    use chrono::Utc;
    use serde_json::json;

    fn record(original: &str, final_text: &str) -> TrainingRecord {
        let original = json!({ "plan": original });
        let final_plan = json!({ "plan": final_text });
        let diff = diff_plans(&original, &final_plan);
        TrainingRecord::from_diff(
            IntentId::new(),
            Utc::now(),
            Some(Persona::Entrepreneur),
            original,
            final_plan,
            diff,
        )
    }

    #[test]
    fn empty_corpus_yields_advice_not_patterns() {
        let report = EditPatternAnalyzer::default().analyze(&[]);
        assert!(report.patterns.is_empty());
        assert_eq!(report.records_analyzed, 0);
        assert_eq!(report.recommendations.len(), 1);
        assert!(report.recommendations[0].contains("No settlements"));
    }

    #[test]
    fn repeated_deletions_surface_as_patterns() {
        let records: Vec<TrainingRecord> = (0..4)
            .map(|_| {
                record(
                    "launch aggressive marketing campaign targeting enterprise customers",
                    "launch campaign targeting enterprise customers",
                )
            })
            .collect();

        let report = EditPatternAnalyzer::default().analyze(&records);

        assert!(report
            .patterns
            .iter()
            .any(|p| p.kind == PatternKind::Deletion && p.text.contains("aggressive")));
        let deletion = report
            .patterns
            .iter()
            .find(|p| p.kind == PatternKind::Deletion)
            .unwrap();
        assert_eq!(deletion.frequency, 1.0);
        assert_eq!(deletion.occurrences, 4);
        assert!(!deletion.examples.is_empty());
        assert!(deletion.examples.len() <= 2);
    }

    #[test]
    fn repeated_additions_surface_as_patterns() {
        let records: Vec<TrainingRecord> = (0..3)
            .map(|_| {
                record(
                    "negotiate vendor contract renewal",
                    "negotiate vendor contract renewal including exit clause review",
                )
            })
            .collect();

        let report = EditPatternAnalyzer::default().analyze(&records);

        assert!(report
            .patterns
            .iter()
            .any(|p| p.kind == PatternKind::Addition && p.text.contains("exit clause")));
    }

    #[test]
    fn filler_phrases_rank_above_plain_deletions() {
        let records: Vec<TrainingRecord> = (0..4)
            .map(|_| {
                record(
                    "let me analyze the vendor landscape before choosing supplier alpha",
                    "choose supplier alpha",
                )
            })
            .collect();

        let report = EditPatternAnalyzer::default().analyze(&records);

        let filler_pos = report
            .patterns
            .iter()
            .position(|p| p.kind == PatternKind::Filler)
            .expect("filler pattern expected");
        let deletion_pos = report
            .patterns
            .iter()
            .position(|p| p.kind == PatternKind::Deletion)
            .expect("deletion pattern expected");

        // Equal frequency: filler wins on kind priority.
        assert!(filler_pos < deletion_pos);
        assert!(report.patterns[filler_pos]
            .recommendation
            .contains("filler language"));
    }

    #[test]
    fn filler_phrases_are_not_double_counted_as_deletions() {
        let records: Vec<TrainingRecord> = (0..3)
            .map(|_| record("let me analyze options here today", "options here today"))
            .collect();

        let report = EditPatternAnalyzer::default().analyze(&records);

        assert!(!report
            .patterns
            .iter()
            .any(|p| p.kind == PatternKind::Deletion && p.text == "let me analyze"));
    }

    #[test]
    fn consistent_shortening_flags_a_tone_shift() {
        let long = "strategic considerations ".repeat(30);
        let records: Vec<TrainingRecord> =
            (0..3).map(|_| record(&long, "keep it short")).collect();

        let report = EditPatternAnalyzer::default().analyze(&records);

        let tone = report
            .patterns
            .iter()
            .find(|p| p.kind == PatternKind::ToneShift)
            .expect("tone shift expected");
        assert!(tone.text.contains("shorten"));
        assert_eq!(tone.recommendation, "Make output more concise");
    }

    #[test]
    fn bullet_restructuring_flags_a_structure_shift() {
        let prose = "first step research the market second step build the prototype third step gather customer feedback";
        let bullets = "- research the market\n- build the prototype\n- gather customer feedback\n- iterate quickly\n- ship the result";
        let records: Vec<TrainingRecord> = (0..3).map(|_| record(prose, bullets)).collect();

        let report = EditPatternAnalyzer::default().analyze(&records);

        assert!(report
            .patterns
            .iter()
            .any(|p| p.kind == PatternKind::ToneShift && p.text.contains("prose to bullets")));
    }

    #[test]
    fn analysis_is_idempotent_over_the_same_snapshot() {
        let records: Vec<TrainingRecord> = (0..4)
            .map(|i| {
                record(
                    &format!("let me analyze aggressive expansion plan number {i}"),
                    &format!("expansion plan number {i}"),
                )
            })
            .collect();

        let analyzer = EditPatternAnalyzer::default();
        let first = analyzer.analyze(&records);
        let second = analyzer.analyze(&records);

        assert_eq!(first, second);
    }

    #[test]
    fn below_threshold_ngrams_stay_hidden() {
        let mut records = vec![record("unique phrase appearing once only", "kept nothing")];
        records.extend((0..9).map(|i| record(&format!("noise {i}"), &format!("noise {i}"))));

        let report = EditPatternAnalyzer::default().analyze(&records);

        assert!(!report
            .patterns
            .iter()
            .any(|p| p.text.contains("unique phrase")));
    }

    #[test]
    fn ngram_sizes_are_two_through_four() {
        let grams = ngrams("alpha beta gamma delta epsilon");
        assert!(grams.contains("alpha beta"));
        assert!(grams.contains("alpha beta gamma delta"));
        assert!(!grams.contains("alpha"));
        assert!(!grams.contains("alpha beta gamma delta epsilon"));
    }

    #[test]
    fn stop_words_and_short_words_are_dropped() {
        let words = tokens("the quick fox and a dog ran");
        assert_eq!(words, vec!["quick", "fox", "dog", "ran"]);
    }
}
