use std::fs;

use tempfile::TempDir;

use super::*;
use crate::{BuildMeta, builtin_dataset_info, load_dataset_info};

fn row(id: &str, model: &str, organ: &str, task: &str, metric: &str, rank: f64) -> PerformanceRow {
    PerformanceRow {
        id: id.to_owned(),
        model_id: model.to_owned(),
        organ: organ.to_owned(),
        task_name: task.to_owned(),
        data_type: "all".to_owned(),
        metrics: Some(metric.to_owned()),
        rank_mean: 1.0 / rank,
        rank,
    }
}

fn sample_rows() -> Vec<PerformanceRow> {
    vec![
        row("10101", "UNI", "Lung", "Subtyping", "AUC", 1.0),
        row("10102", "CONCH", "Lung", "Subtyping", "AUC", 2.0),
        row("20101", "UNI", "Breast", "Grading", "F1", 2.0),
        row("20102", "CONCH", "Breast", "Grading", "Kappa", 1.0),
        row("30101", "UNI", "lung", "Survival", "C-index", 1.0),
    ]
}

#[test]
fn task_id_strips_last_two_characters() {
    assert_eq!(task_id_from_record_id("10101"), "101");
    assert_eq!(task_id_from_record_id("ab"), "");
    assert_eq!(task_id_from_record_id("x"), "");
    assert_eq!(task_id_from_record_id("ü123"), "ü1");
}

#[test]
fn tasks_are_derived_in_first_seen_order() {
    let catalog = Catalog::from_rows(sample_rows(), None);
    let ids = catalog.tasks().iter().map(|t| t.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["101", "201", "301"]);

    let grading = catalog.task("201").unwrap();
    assert_eq!(grading.name, "Grading");
    assert_eq!(grading.task_type, "Grading");
    assert_eq!(grading.cohort, "Breast");
    assert_eq!(grading.evaluation_metrics, vec!["F1".to_owned(), "Kappa".to_owned()]);
    assert_eq!(grading.description, "Grading task for Breast");
}

#[test]
fn later_rows_overwrite_task_fields() {
    let mut rows = sample_rows();
    rows.push(row("10103", "UNI", "Lung", "Subtyping-v2", "AUC", 3.0));
    let catalog = Catalog::from_rows(rows, None);
    assert_eq!(catalog.task("101").unwrap().name, "Subtyping-v2");
    assert_eq!(catalog.tasks().len(), 3);
}

#[test]
fn organs_are_distinct_by_name_and_keyed_lowercase() {
    let catalog = Catalog::from_rows(sample_rows(), None);
    let names = catalog.organs().iter().map(|o| o.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Lung", "Breast", "lung"]);
    assert_eq!(catalog.organ("breast").unwrap().name, "Breast");
    assert!(catalog.organ("Breast").is_none());
}

#[test]
fn models_fall_back_to_performance_rows() {
    let catalog = Catalog::from_rows(sample_rows(), None);
    let names = catalog.models().iter().map(|m| m.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["UNI", "CONCH"]);
    assert_eq!(catalog.dangling_references(), 0);
}

#[test]
fn explicit_models_mark_unknown_rows_dangling() {
    let catalog = Catalog::from_rows(sample_rows(), Some(vec![Model::named("UNI")]));
    assert_eq!(catalog.models().len(), 1);
    assert_eq!(catalog.dangling_references(), 2);
    assert!(catalog.model("CONCH").is_none());
    assert!(catalog.model("UNI").is_some());
}

#[test]
fn task_types_and_metrics_are_distinct() {
    let catalog = Catalog::from_rows(sample_rows(), None);
    assert_eq!(catalog.task_types(), vec!["Subtyping", "Grading", "Survival"]);
    assert_eq!(catalog.metrics(), vec!["AUC", "F1", "Kappa", "C-index"]);
}

#[test]
fn load_reads_variant_files() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("performance_avg.json"),
        r#"[{"id": 10101, "model_id": "UNI", "organ": "Lung", "task_name": "Subtyping",
             "data_type": "avg", "metrics": "AUC", "rank_mean": 0.9, "rank": 1}]"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("model_avg.json"),
        r#"[{"name": "UNI", "architecture": "ViT-L"}, {"name": "CONCH"}]"#,
    )
    .unwrap();

    let catalog = Catalog::load(dir.path(), DataType::Avg, CompetitionType::Segment).unwrap();
    assert_eq!(catalog.data_type(), DataType::Avg);
    assert_eq!(catalog.competition(), CompetitionType::Segment);
    assert_eq!(catalog.performances().len(), 1);
    assert_eq!(catalog.models().len(), 2);
    assert_eq!(catalog.model("UNI").unwrap().architecture, "ViT-L");
}

#[test]
fn load_without_performance_fixture_fails() {
    let dir = TempDir::new().unwrap();
    let err = Catalog::load(dir.path(), DataType::AllData, CompetitionType::Segment).unwrap_err();
    assert!(matches!(err, CatalogError::MissingFixture(_)));
    assert!(err.to_string().contains("performance_all.json"));
}

#[test]
fn load_reports_malformed_json() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("performance_all.json"), "{not json").unwrap();
    let err = Catalog::load(dir.path(), DataType::AllData, CompetitionType::Segment).unwrap_err();
    assert!(matches!(err, CatalogError::Json { .. }));
}

#[test]
fn build_meta_is_optional() {
    let dir = TempDir::new().unwrap();
    assert_eq!(BuildMeta::load(dir.path()).unwrap(), None);

    fs::write(
        dir.path().join("build-meta.json"),
        r#"{"buildDate": "2025-03-01", "buildTime": "10:00:00", "buildTimestamp": "2025-03-01 10:00:00"}"#,
    )
    .unwrap();
    let meta = BuildMeta::load(dir.path()).unwrap().unwrap();
    assert_eq!(meta.last_updated_by, "Unknown");
    assert_eq!(meta.last_updated(), "2025-03-01 10:00:00 by Unknown");
}

#[test]
fn dataset_info_falls_back_to_builtin_table() {
    let dir = TempDir::new().unwrap();
    assert_eq!(load_dataset_info(dir.path()).unwrap(), builtin_dataset_info());

    fs::write(
        dir.path().join("dataset_info.json"),
        r#"[{"organ": "Skin", "source": "H10", "cohort": "Skin-Cohort", "caseNumber": 5, "slidesNumber": 7}]"#,
    )
    .unwrap();
    let rows = load_dataset_info(dir.path()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].slides_number, 7);
}
