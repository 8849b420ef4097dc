use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::db::RecordStore;
use crate::error::Result;
use crate::models::dto::ExportDTO;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { path: PathBuf, total_records: usize },
    /// Nothing to export; the store was empty.
    Skipped,
}

pub fn export_file_name(now: &DateTime<Local>) -> String {
    format!("garudarush_{}.json", now.format("%Y%m%d_%H%M%S"))
}

/// Serialize the store as pretty JSON, or `None` when it is empty.
pub fn to_json(
    store: &RecordStore,
    include_log: bool,
    now: &DateTime<Local>,
) -> Result<Option<String>> {
    if store.is_empty() {
        return Ok(None);
    }
    let document = ExportDTO {
        export_time: now.to_rfc3339(),
        total_records: store.len(),
        records: store.records(),
        operation_log: include_log.then(|| store.operation_log()),
    };
    Ok(Some(serde_json::to_string_pretty(&document)?))
}

pub fn export_to_dir(store: &RecordStore, dir: &Path, include_log: bool) -> Result<ExportOutcome> {
    let now = Local::now();
    let json = match to_json(store, include_log, &now)? {
        Some(json) => json,
        None => {
            info!("no records to export");
            return Ok(ExportOutcome::Skipped);
        }
    };

    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(&now));
    fs::write(&path, json)?;
    info!(path = %path.display(), total_records = store.len(), "database exported");

    Ok(ExportOutcome::Written { path, total_records: store.len() })
}
