//! Build metadata written next to the fixtures at publish time.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::CatalogError;
use crate::catalog::read_optional_json;

/// File name of the build metadata fixture.
pub const BUILD_META_FILE: &str = "build-meta.json";

/// When and by whom the published results were last rebuilt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildMeta {
    #[serde(default)]
    pub build_date: String,
    #[serde(default)]
    pub build_time: String,
    #[serde(default)]
    pub build_timestamp: String,
    #[serde(default = "unknown_author")]
    pub last_updated_by: String,
}

impl BuildMeta {
    /// Load `build-meta.json` from `dir`, if present.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file exists but cannot be read or
    /// parsed.
    pub fn load(dir: &Path) -> Result<Option<Self>, CatalogError> {
        read_optional_json(&dir.join(BUILD_META_FILE))
    }

    /// `"<timestamp> by <author>"`, falling back to the date when the
    /// timestamp is empty.
    #[must_use]
    pub fn last_updated(&self) -> String {
        let when = if self.build_timestamp.is_empty() {
            format!("{} {}", self.build_date, self.build_time).trim().to_owned()
        } else {
            self.build_timestamp.clone()
        };
        format!("{when} by {}", self.last_updated_by)
    }
}

fn unknown_author() -> String {
    "Unknown".to_owned()
}
