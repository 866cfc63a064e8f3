//! Benchmark record model and fixture loading for the medboard leaderboard.
//!
//! This crate owns the data side of the leaderboard: the typed rows read from
//! the pre-computed JSON result files, the tasks and organs derived from them,
//! and the immutable [`Catalog`] snapshot every view is computed from.

mod catalog;
mod dataset;
mod meta;
mod raw;

use serde::{Deserialize, Serialize};

pub use catalog::{Catalog, CatalogError, derive_tasks, distinct_metrics, task_id_from_record_id};
pub use dataset::{DatasetRow, builtin_dataset_info, load_dataset_info};
pub use meta::BuildMeta;
pub use raw::{PerformanceRow, derive_models};

/// Placeholder used for model metadata the fixtures leave out.
pub const METADATA_PLACEHOLDER: &str = "-";

/// Fixture variant selected by the `data` query parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Every measurement (`*_all.json`).
    #[default]
    AllData,
    /// Averaged measurements (`*_avg.json`).
    Avg,
}

impl DataType {
    /// Resolve the query-parameter value. Anything other than `avg` selects
    /// [`DataType::AllData`].
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("avg") => Self::Avg,
            _ => Self::AllData,
        }
    }

    /// Suffix used in fixture file names.
    #[must_use]
    pub fn file_suffix(self) -> &'static str {
        match self {
            Self::AllData => "all",
            Self::Avg => "avg",
        }
    }

    /// Human-readable title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::AllData => "All Data",
            Self::Avg => "AVG",
        }
    }
}

/// Competition the results belong to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompetitionType {
    /// Segment Anything in medical images (competition 1847).
    #[default]
    Segment,
}

impl CompetitionType {
    /// Numeric competition id as used in the `competition` query parameter.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Segment => "1847",
        }
    }

    /// Parse a competition id or name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value == "1847" || value.eq_ignore_ascii_case("segment") {
            Some(Self::Segment)
        } else {
            None
        }
    }
}

/// A named evaluation unit scoped to one organ and cohort.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task id derived from the record id prefix.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Organ the task evaluates.
    pub organ: String,
    /// Task type, e.g. segmentation or classification.
    pub task_type: String,
    /// Cohort the task's cases come from.
    pub cohort: String,
    /// Distinct metric names recorded for the task, in first-seen order.
    pub evaluation_metrics: Vec<String>,
    /// Short generated description.
    pub description: String,
}

impl Task {
    /// First metric recorded for the task, if any.
    #[must_use]
    pub fn primary_metric(&self) -> Option<&str> {
        self.evaluation_metrics.first().map(String::as_str)
    }

    /// Label used on chart axes: `"<name>(<organ>)"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}({})", self.name, self.organ)
    }
}

/// A benchmarked system. Only `name` takes part in ranking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    #[serde(default = "placeholder")]
    pub citation: String,
    #[serde(default = "placeholder")]
    pub slides: String,
    #[serde(default = "placeholder")]
    pub patches: String,
    #[serde(default = "placeholder")]
    pub parameters: String,
    #[serde(default = "placeholder")]
    pub architecture: String,
    #[serde(default = "placeholder")]
    pub pretraining_strategy: String,
    #[serde(default = "placeholder")]
    pub pretraining_data_source: String,
    #[serde(default = "placeholder")]
    pub stain: String,
    #[serde(default = "placeholder")]
    pub released_date: String,
    #[serde(default = "placeholder")]
    pub publication: String,
    /// Pre-computed overall rank from the rank sheet. `0` means unknown.
    #[serde(default)]
    pub rank: u32,
}

impl Model {
    /// A model with placeholder metadata.
    #[must_use]
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            citation: placeholder(),
            slides: placeholder(),
            patches: placeholder(),
            parameters: placeholder(),
            architecture: placeholder(),
            pretraining_strategy: placeholder(),
            pretraining_data_source: placeholder(),
            stain: placeholder(),
            released_date: placeholder(),
            publication: placeholder(),
            rank: 0,
        }
    }

    /// Pre-computed overall rank, when the fixture carries one.
    #[must_use]
    pub fn listed_rank(&self) -> Option<u32> {
        (self.rank > 0).then_some(self.rank)
    }
}

/// One (task, model) measurement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    /// Record id; the task id is this without its last two characters.
    pub id: String,
    pub model_id: String,
    pub organ: String,
    pub task_name: String,
    pub data_type: String,
    pub task_id: String,
    /// Metric the measurement was taken with.
    pub metric: Option<String>,
    /// Score used to order models within a task (higher is better).
    pub rank_mean: f64,
    /// Rank recorded by the evaluation (lower is better).
    pub rank: f64,
}

/// An organ derived from the task list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organ {
    /// Lower-cased organ name; the key organ selections use.
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Organ {
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self {
            id: name.to_lowercase(),
            name: name.to_owned(),
            description: format!("{name} related tasks"),
        }
    }
}

fn placeholder() -> String {
    METADATA_PLACEHOLDER.to_owned()
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
