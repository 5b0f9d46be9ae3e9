//! Tracker boundary JSON loader.
//!
//! The boundary file is an export from the construction-tracking platform:
//!
//! ```json
//! {
//!   "tableDetails": [
//!     {
//!       "tableName": "A01T01R01",
//!       "TopRightLatitude": 43.0011, "TopRightLongitude": -75.4502,
//!       "BottomLeftLatitude": 43.0009, "BottomLeftLongitude": -75.4507
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{SiteError, SiteResult};
use crate::geo::{BoundaryIndex, TrackerBoundary};

#[derive(Debug, Deserialize)]
struct BoundaryFile {
    #[serde(rename = "tableDetails", default)]
    table_details: Vec<TableDetail>,
}

#[derive(Debug, Deserialize)]
struct TableDetail {
    #[serde(rename = "tableName", default)]
    table_name: Option<String>,
    #[serde(rename = "TopRightLatitude", default)]
    top_right_latitude: Option<f64>,
    #[serde(rename = "TopRightLongitude", default)]
    top_right_longitude: Option<f64>,
    #[serde(rename = "BottomLeftLatitude", default)]
    bottom_left_latitude: Option<f64>,
    #[serde(rename = "BottomLeftLongitude", default)]
    bottom_left_longitude: Option<f64>,
}

impl TableDetail {
    /// Boundary for a record with a name and all four corner values.
    fn into_boundary(self) -> Option<(String, TrackerBoundary)> {
        let name = self.table_name.filter(|n| !n.is_empty())?;
        let top_right = (self.top_right_latitude?, self.top_right_longitude?);
        let bottom_left = (self.bottom_left_latitude?, self.bottom_left_longitude?);
        Some((name, TrackerBoundary::from_corners(top_right, bottom_left)))
    }
}

/// Parse boundary JSON text. Incomplete records are skipped.
pub fn parse_tracker_boundaries(json: &str) -> Result<BoundaryIndex, serde_json::Error> {
    let file: BoundaryFile = serde_json::from_str(json)?;
    let total = file.table_details.len();
    let index: BoundaryIndex = file
        .table_details
        .into_iter()
        .filter_map(TableDetail::into_boundary)
        .collect();

    if index.len() < total {
        debug!(
            skipped = total - index.len(),
            kept = index.len(),
            "Skipped incomplete or duplicate boundary records"
        );
    }
    Ok(index)
}

/// Load the boundary file, failing with NotFound when it is absent.
pub fn load_tracker_boundaries(path: &Path) -> SiteResult<BoundaryIndex> {
    if !path.exists() {
        return Err(SiteError::not_found("JSON file not found"));
    }
    let json = std::fs::read_to_string(path)?;
    parse_tracker_boundaries(&json).map_err(|e| {
        warn!(path = %path.display(), error = %e, "Unreadable boundary file");
        SiteError::format("boundary JSON", path, e.to_string())
    })
}
