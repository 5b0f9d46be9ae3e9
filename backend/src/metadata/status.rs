//! Per-date tracker status CSV loader.
//!
//! Columns used: `Tracker ID`, `Current_stage`, `Status`. Other columns are
//! ignored.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SiteResult;

/// Construction stage and status of one tracker on one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerStatus {
    pub stage: String,
    pub status: String,
}

/// Tracker statuses keyed by tracker id.
pub type TrackerStatusMap = BTreeMap<String, TrackerStatus>;

#[derive(Debug, Deserialize)]
struct StatusRow {
    #[serde(rename = "Tracker ID", default)]
    tracker_id: String,
    #[serde(rename = "Current_stage", default)]
    current_stage: String,
    #[serde(rename = "Status", default)]
    status: String,
}

/// Parse status CSV from a reader. Rows without a tracker id are skipped.
pub fn parse_tracker_status<R: Read>(reader: R) -> SiteResult<TrackerStatusMap> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut statuses = TrackerStatusMap::new();
    for row in csv.deserialize::<StatusRow>() {
        let row = row?;
        let tracker_id = row.tracker_id.trim();
        if tracker_id.is_empty() {
            continue;
        }
        statuses.insert(
            tracker_id.to_string(),
            TrackerStatus {
                stage: row.current_stage.trim().to_string(),
                status: row.status.trim().to_string(),
            },
        );
    }
    Ok(statuses)
}

/// Load a status CSV. A missing file is not an error and yields an empty map.
pub fn load_tracker_status(path: &Path) -> SiteResult<TrackerStatusMap> {
    if !path.exists() {
        debug!(path = %path.display(), "No tracker status file");
        return Ok(TrackerStatusMap::new());
    }
    let file = std::fs::File::open(path)?;
    parse_tracker_status(std::io::BufReader::new(file))
}
