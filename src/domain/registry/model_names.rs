//! Model name discovery from run tags

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::{debug, warn};

use super::Run;

/// Tag holding the JSON history of models logged by a run
pub const LOG_MODEL_HISTORY_TAG: &str = "mlflow.log-model.history";

/// Tag some training scripts set with the model's name directly
pub const MODEL_NAME_TAG: &str = "model_name";

/// Collect the distinct model names and artifact paths referenced by `runs`.
///
/// Runs whose history tag cannot be parsed are skipped with a warning; the
/// remaining runs still contribute. The result is sorted.
pub fn extract_model_names_from_runs(runs: &[Run]) -> Vec<String> {
    let mut names = BTreeSet::new();

    for run in runs {
        if let Some(history) = run.tags.get(LOG_MODEL_HISTORY_TAG) {
            match parse_history(history) {
                Ok(paths) => names.extend(paths),
                Err(e) => {
                    warn!(run_id = %run.run_id, error = %e, "Failed to parse model history, skipping");
                }
            }
        }

        if let Some(name) = run.tags.get(MODEL_NAME_TAG) {
            if !name.is_empty() {
                names.insert(name.clone());
            }
        }
    }

    debug!(count = names.len(), "Extracted model names from runs");

    names.into_iter().collect()
}

fn parse_history(raw: &str) -> Result<Vec<String>, serde_json::Error> {
    let entries: Vec<Value> = serde_json::from_str(raw)?;

    Ok(entries
        .iter()
        .filter_map(|entry| entry.get("artifact_path").and_then(Value::as_str))
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect())
}
