//! Structural plan comparison.
//!
//! Walks all leaf fields of two JSON snapshots and classifies each original
//! leaf as unchanged, changed, or removed (final-only leaves are additions).
//! Arrays are compared value-first rather than index-first: exact matches
//! pair up regardless of position, similar leftovers pair as changes, and
//! whatever remains is a removal or an addition. This keeps a reordered but
//! untouched list from counting as a rewrite.

use serde_json::Value;

/// Result of structurally comparing two plan snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDiff {
    /// One human-readable sentence per changed leaf path.
    pub modifications: Vec<String>,
    /// Fraction of original leaves the human left unchanged, in [0, 1].
    pub acceptance_rate: f64,
    /// Leaves present and unchanged in both snapshots.
    pub unchanged: usize,
    /// Original leaves whose value was altered.
    pub changed: usize,
    /// Original leaves missing from the final snapshot.
    pub removed: usize,
    /// Final-snapshot leaves with no original counterpart.
    pub added: usize,
    /// Total leaf count of the original snapshot.
    pub original_leaves: usize,
}

impl PlanDiff {
    /// True when the human accepted the plan verbatim.
    pub fn is_identical(&self) -> bool {
        self.modifications.is_empty()
    }
}

/// Compare an original AI-produced plan against the human-edited final plan.
///
/// An original with zero leaves yields acceptance rate 1.0: there was
/// nothing to accept or reject, which is not an error.
pub fn diff_plans(original: &Value, final_plan: &Value) -> PlanDiff {
    let original_leaves = leaf_count(original);

    let mut walk = Walk::default();
    walk.compare(original, final_plan, "");

    let acceptance_rate = if original_leaves == 0 {
        1.0
    } else {
        (walk.unchanged as f64 / original_leaves as f64).clamp(0.0, 1.0)
    };

    PlanDiff {
        modifications: walk.modifications,
        acceptance_rate,
        unchanged: walk.unchanged,
        changed: walk.changed,
        removed: walk.removed,
        added: walk.added,
        original_leaves,
    }
}

/// Count leaf values (scalars) in a nested structure.
fn leaf_count(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.values().map(leaf_count).sum(),
        Value::Array(items) => items.iter().map(leaf_count).sum(),
        _ => 1,
    }
}

#[derive(Default)]
struct Walk {
    modifications: Vec<String>,
    unchanged: usize,
    changed: usize,
    removed: usize,
    added: usize,
}

impl Walk {
    fn compare(&mut self, original: &Value, final_plan: &Value, path: &str) {
        match (original, final_plan) {
            (Value::Object(orig), Value::Object(fin)) => {
                for (key, orig_value) in orig {
                    let child = child_path(path, key);
                    match fin.get(key) {
                        Some(fin_value) => self.compare(orig_value, fin_value, &child),
                        None => self.record_removed(orig_value, &child),
                    }
                }
                for (key, fin_value) in fin {
                    if !orig.contains_key(key) {
                        self.record_added(fin_value, &child_path(path, key));
                    }
                }
            }
            (Value::Array(orig), Value::Array(fin)) => {
                self.compare_arrays(orig, fin, path);
            }
            (orig, fin) if !orig.is_object() && !orig.is_array() && !fin.is_object() && !fin.is_array() => {
                if orig == fin {
                    self.unchanged += 1;
                } else {
                    self.changed += 1;
                    self.modifications.push(format!(
                        "Changed {path} from {} to {}",
                        render(orig),
                        render(fin)
                    ));
                }
            }
            // Kind mismatch (e.g. string replaced by a list): one coarse change
            // covering every original leaf underneath.
            (orig, fin) => {
                self.changed += leaf_count(orig);
                self.modifications.push(format!(
                    "Changed {path} from {} to {}",
                    render(orig),
                    render(fin)
                ));
            }
        }
    }

    fn compare_arrays(&mut self, orig: &[Value], fin: &[Value], path: &str) {
        let mut orig_matched = vec![false; orig.len()];
        let mut fin_used = vec![false; fin.len()];

        // Exact matches first, regardless of position.
        for (i, orig_item) in orig.iter().enumerate() {
            if let Some(j) = fin
                .iter()
                .enumerate()
                .position(|(j, fin_item)| !fin_used[j] && fin_item == orig_item)
            {
                orig_matched[i] = true;
                fin_used[j] = true;
                self.unchanged += leaf_count(orig_item);
            }
        }

        // Pair similar leftovers as in-place edits.
        for (i, orig_item) in orig.iter().enumerate() {
            if orig_matched[i] {
                continue;
            }
            let candidate = fin
                .iter()
                .enumerate()
                .position(|(j, fin_item)| !fin_used[j] && similar(orig_item, fin_item));
            if let Some(j) = candidate {
                orig_matched[i] = true;
                fin_used[j] = true;
                self.compare(orig_item, &fin[j], &index_path(path, i));
            }
        }

        // Whatever is left was removed or added outright.
        for (i, orig_item) in orig.iter().enumerate() {
            if !orig_matched[i] {
                self.record_removed(orig_item, &index_path(path, i));
            }
        }
        for (j, fin_item) in fin.iter().enumerate() {
            if !fin_used[j] {
                self.record_added(fin_item, &index_path(path, j));
            }
        }
    }

    fn record_removed(&mut self, value: &Value, path: &str) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.record_removed(child, &child_path(path, key));
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.record_removed(item, &index_path(path, i));
                }
            }
            scalar => {
                self.removed += 1;
                self.modifications
                    .push(format!("Removed {path} ({})", render(scalar)));
            }
        }
    }

    fn record_added(&mut self, value: &Value, path: &str) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    self.record_added(child, &child_path(path, key));
                }
            }
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.record_added(item, &index_path(path, i));
                }
            }
            scalar => {
                self.added += 1;
                self.modifications
                    .push(format!("Added {path} ({})", render(scalar)));
            }
        }
    }
}

/// Can two unequal values plausibly be the same item after an edit?
fn similar(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::String(a), Value::String(b)) => similar_strings(a, b),
        (Value::Number(_), Value::Number(_)) => true,
        (Value::Bool(_), Value::Bool(_)) => true,
        (Value::Null, Value::Null) => true,
        (Value::Object(_), Value::Object(_)) => true,
        (Value::Array(_), Value::Array(_)) => true,
        _ => false,
    }
}

fn similar_strings(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a.contains(b) || b.contains(a) {
        return true;
    }
    let prefix = a
        .chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count();
    let shorter = a.chars().count().min(b.chars().count());
    prefix >= 3 || prefix * 2 >= shorter
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn index_path(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

/// Render a value for a modification sentence, truncating long text.
fn render(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.chars().count() > 80 {
        let truncated: String = text.chars().take(77).collect();
        format!("{truncated}...")
    } else {
        text
    }
}
