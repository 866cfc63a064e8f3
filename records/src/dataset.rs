//! Per-hospital dataset information shown alongside the leaderboard.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CatalogError;
use crate::catalog::read_optional_json;

/// File name of the optional dataset information fixture.
pub const DATASET_INFO_FILE: &str = "dataset_info.json";

/// One cohort contributed by one hospital.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetRow {
    pub organ: String,
    /// Contributing hospital code, e.g. `H1`.
    pub source: String,
    pub cohort: String,
    pub case_number: u32,
    pub slides_number: u32,
}

impl DatasetRow {
    fn new(organ: &str, source: &str, cohort: &str, case_number: u32, slides_number: u32) -> Self {
        Self {
            organ: organ.to_owned(),
            source: source.to_owned(),
            cohort: cohort.to_owned(),
            case_number,
            slides_number,
        }
    }
}

/// The dataset table published with the benchmark.
#[must_use]
pub fn builtin_dataset_info() -> Vec<DatasetRow> {
    vec![
        DatasetRow::new("Lung", "H1", "Metastatic-Cohort", 846, 1422),
        DatasetRow::new("Lung", "H5", "Metastatic-Cohort", 493, 493),
        DatasetRow::new("Lung", "H6", "Metastatic-Cohort", 826, 1422),
        DatasetRow::new("Stomach", "H7", "Biopsy-Cohort", 1345, 2700),
        DatasetRow::new("Stomach", "H1", "Gastric-Cohort", 403, 404),
        DatasetRow::new("Stomach", "H4", "Gastric-Cohort", 320, 320),
        DatasetRow::new("Stomach", "H3", "Gastric-Cohort", 260, 260),
        DatasetRow::new("Colorectal", "H8", "Colorectal-Cohort", 622, 2779),
        DatasetRow::new("Colorectal", "H1", "Colorectal-Cohort", 294, 301),
        DatasetRow::new("Breast", "H9", "Breast-Cohort", 418, 421),
        DatasetRow::new("Breast", "H2", "Breast-Cohort", 2045, 4275),
        DatasetRow::new("Brain", "H1", "Glioma-Cohort", 677, 1362),
    ]
}

/// Load `dataset_info.json` from `dir`, or the built-in table when absent.
///
/// # Errors
///
/// Returns [`CatalogError`] when the file exists but cannot be read or parsed.
pub fn load_dataset_info(dir: &Path) -> Result<Vec<DatasetRow>, CatalogError> {
    Ok(read_optional_json(&dir.join(DATASET_INFO_FILE))?.unwrap_or_else(builtin_dataset_info))
}
