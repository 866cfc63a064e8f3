//! Immutable snapshot of one fixture variant.
//!
//! DESIGN
//! ======
//! Fixtures are read once and never mutated. Tasks are not stored in the
//! fixtures; they are rebuilt by grouping performance rows on the task-id
//! prefix of their record ids. Rows that point at unknown tasks or models are
//! kept in the snapshot but counted as dangling so views can skip them.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::raw::{PerformanceRow, derive_models};
use crate::{CompetitionType, DataType, Model, Organ, Performance, Task};

/// Error returned while loading fixtures.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// A fixture file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A fixture file is not valid JSON for its row type.
    #[error("invalid fixture {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The required performance fixture does not exist.
    #[error("missing fixture {0}")]
    MissingFixture(PathBuf),
}

/// Strip the two-character fold suffix from a record id.
#[must_use]
pub fn task_id_from_record_id(record_id: &str) -> String {
    let keep = record_id.chars().count().saturating_sub(2);
    record_id.chars().take(keep).collect()
}

/// Rebuild tasks from performance rows.
///
/// Tasks keep first-seen order. Scalar fields come from the last row seen for
/// a task; `evaluation_metrics` collects every distinct metric of its rows.
#[must_use]
pub fn derive_tasks(performances: &[Performance]) -> Vec<Task> {
    let mut index = HashMap::<&str, usize>::new();
    let mut tasks = Vec::<Task>::new();

    for perf in performances {
        let slot = *index.entry(perf.task_id.as_str()).or_insert_with(|| {
            tasks.push(Task {
                id: perf.task_id.clone(),
                name: String::new(),
                organ: String::new(),
                task_type: String::new(),
                cohort: String::new(),
                evaluation_metrics: Vec::new(),
                description: String::new(),
            });
            tasks.len() - 1
        });

        let task = &mut tasks[slot];
        task.name.clone_from(&perf.task_name);
        task.organ.clone_from(&perf.organ);
        task.task_type.clone_from(&perf.task_name);
        task.cohort.clone_from(&perf.organ);
        task.description = format!("{} task for {}", perf.task_name, perf.organ);
        if let Some(metric) = &perf.metric
            && !task.evaluation_metrics.contains(metric)
        {
            task.evaluation_metrics.push(metric.clone());
        }
    }

    tasks
}

/// Loaded fixtures plus lookup indexes.
#[derive(Clone, Debug)]
pub struct Catalog {
    data_type: DataType,
    competition: CompetitionType,
    tasks: Vec<Task>,
    models: Vec<Model>,
    performances: Vec<Performance>,
    organs: Vec<Organ>,
    task_index: HashMap<String, usize>,
    model_index: HashMap<String, usize>,
    dangling: usize,
}

impl Catalog {
    /// Build a catalog from already-parsed rows. When `models` is `None`
    /// the model list is derived from the performance rows.
    #[must_use]
    pub fn from_rows(rows: Vec<PerformanceRow>, models: Option<Vec<Model>>) -> Self {
        let performances = rows.into_iter().map(Performance::from).collect::<Vec<_>>();
        Self::from_parts(performances, models)
    }

    /// Build a catalog from performances and an optional model list.
    #[must_use]
    pub fn from_parts(performances: Vec<Performance>, models: Option<Vec<Model>>) -> Self {
        let models = models.unwrap_or_else(|| derive_models(&performances));
        let tasks = derive_tasks(&performances);

        let mut seen_organs = HashSet::<&str>::new();
        let organs = tasks
            .iter()
            .filter(|t| seen_organs.insert(t.organ.as_str()))
            .map(|t| Organ::from_name(&t.organ))
            .collect::<Vec<_>>();

        let task_index = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect::<HashMap<_, _>>();
        let mut model_index = HashMap::<String, usize>::new();
        for (i, model) in models.iter().enumerate() {
            model_index.entry(model.name.clone()).or_insert(i);
        }

        let dangling = performances
            .iter()
            .filter(|p| !task_index.contains_key(&p.task_id) || !model_index.contains_key(&p.model_id))
            .count();

        Self {
            data_type: DataType::default(),
            competition: CompetitionType::default(),
            tasks,
            models,
            performances,
            organs,
            task_index,
            model_index,
            dangling,
        }
    }

    /// Load `performance_<variant>.json` and, when present,
    /// `model_<variant>.json` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingFixture`] when the performance fixture
    /// does not exist, and [`CatalogError::Io`] / [`CatalogError::Json`] for
    /// unreadable or malformed files.
    pub fn load(dir: &Path, data_type: DataType, competition: CompetitionType) -> Result<Self, CatalogError> {
        let suffix = data_type.file_suffix();
        let performance_path = dir.join(format!("performance_{suffix}.json"));
        let rows = read_optional_json::<Vec<PerformanceRow>>(&performance_path)?
            .ok_or_else(|| CatalogError::MissingFixture(performance_path.clone()))?;

        let model_path = dir.join(format!("model_{suffix}.json"));
        let models = read_optional_json::<Vec<Model>>(&model_path)?;
        if models.is_none() {
            debug!(path = %model_path.display(), "no model fixture; deriving models from performance rows");
        }

        let mut catalog = Self::from_rows(rows, models);
        catalog.data_type = data_type;
        catalog.competition = competition;

        if catalog.dangling > 0 {
            warn!(
                dangling = catalog.dangling,
                "performance rows reference unknown tasks or models; they will not be displayed"
            );
        }
        info!(
            data_type = data_type.file_suffix(),
            competition = competition.id(),
            tasks = catalog.tasks.len(),
            models = catalog.models.len(),
            performances = catalog.performances.len(),
            "catalog loaded"
        );

        Ok(catalog)
    }

    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    #[must_use]
    pub fn competition(&self) -> CompetitionType {
        self.competition
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    #[must_use]
    pub fn performances(&self) -> &[Performance] {
        &self.performances
    }

    #[must_use]
    pub fn organs(&self) -> &[Organ] {
        &self.organs
    }

    #[must_use]
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.task_index.get(task_id).map(|&i| &self.tasks[i])
    }

    #[must_use]
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.model_index.get(name).map(|&i| &self.models[i])
    }

    #[must_use]
    pub fn organ(&self, organ_id: &str) -> Option<&Organ> {
        self.organs.iter().find(|o| o.id == organ_id)
    }

    /// Distinct task types in first-seen order.
    #[must_use]
    pub fn task_types(&self) -> Vec<String> {
        let mut seen = HashSet::<&str>::new();
        self.tasks
            .iter()
            .filter(|t| seen.insert(t.task_type.as_str()))
            .map(|t| t.task_type.clone())
            .collect()
    }

    /// Distinct metrics across every task, in first-seen order.
    #[must_use]
    pub fn metrics(&self) -> Vec<String> {
        distinct_metrics(&self.tasks)
    }

    /// Number of performance rows pointing at an unknown task or model.
    #[must_use]
    pub fn dangling_references(&self) -> usize {
        self.dangling
    }
}

/// Distinct metrics of `tasks`, in first-seen order.
pub fn distinct_metrics<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<String> {
    let mut out = Vec::<String>::new();
    for metric in tasks.into_iter().flat_map(|t| &t.evaluation_metrics) {
        if !out.contains(metric) {
            out.push(metric.clone());
        }
    }
    out
}

/// Read and parse a JSON fixture, returning `None` when the file is absent.
pub(crate) fn read_optional_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, CatalogError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CatalogError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&text).map(Some).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;
