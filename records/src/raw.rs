//! Raw fixture rows as exported from the result spreadsheets.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Model, Performance, task_id_from_record_id};

/// One row of `performance_<variant>.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    /// Record id. Spreadsheet exports write it as a number or a string.
    #[serde(deserialize_with = "record_id")]
    pub id: String,
    pub model_id: String,
    pub organ: String,
    pub task_name: String,
    #[serde(default)]
    pub data_type: String,
    #[serde(default)]
    pub metrics: Option<String>,
    pub rank_mean: f64,
    pub rank: f64,
}

impl From<PerformanceRow> for Performance {
    fn from(row: PerformanceRow) -> Self {
        let task_id = task_id_from_record_id(&row.id);
        Self {
            id: row.id,
            model_id: row.model_id,
            organ: row.organ,
            task_name: row.task_name,
            data_type: row.data_type,
            task_id,
            metric: row.metrics.filter(|m| !m.trim().is_empty()),
            rank_mean: row.rank_mean,
            rank: row.rank,
        }
    }
}

/// Models implied by the performance rows, in first-seen order, with
/// placeholder metadata. Used when no model fixture exists.
#[must_use]
pub fn derive_models(performances: &[Performance]) -> Vec<Model> {
    let mut seen = HashSet::<&str>::new();
    performances
        .iter()
        .filter(|p| seen.insert(p.model_id.as_str()))
        .map(|p| Model::named(&p.model_id))
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
    Float(f64),
}

#[allow(clippy::cast_possible_truncation)]
fn record_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Integer(n) => n.to_string(),
        RawId::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => (f as i64).to_string(),
        RawId::Float(f) => f.to_string(),
    })
}

#[cfg(test)]
#[path = "raw_test.rs"]
mod raw_test;
