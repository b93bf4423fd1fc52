//! Versioned JSON export/import of the full data set.
//!
//! The bundle shape is fixed by the app's original export format: a
//! camelCase envelope carrying a version string, an export date and one
//! section per storage key. Import tolerates missing or older sections
//! (serde defaults fill the gaps) and ignores unknown extra fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ImportError;
use crate::model::{CravingLog, JournalEntry, Settings, TaskCompletion, User};
use crate::progress::ProgressSnapshot;

/// Version written into every export.
pub const EXPORT_VERSION: &str = "1.0";

/// The full exported data set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    pub version: String,
    pub export_date: DateTime<Utc>,
    #[serde(default)]
    pub data: ExportData,
}

/// One section per storage key; all optional for forward compatibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub progress: Option<ProgressSnapshot>,
    #[serde(default)]
    pub journal_entries: Vec<JournalEntry>,
    #[serde(default)]
    pub craving_logs: Vec<CravingLog>,
    #[serde(default)]
    pub task_completions: Vec<TaskCompletion>,
    #[serde(default)]
    pub settings: Option<Settings>,
}

/// Accept any 1.x bundle.
pub fn check_version(version: &str) -> Result<(), ImportError> {
    match version.split('.').next() {
        Some("1") => Ok(()),
        _ => Err(ImportError::UnsupportedVersion(version.to_string())),
    }
}
