//! Discovery of capture dates.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::DATE_FOLDER_PREFIX;
use crate::error::{SiteError, SiteResult};

/// One capture date available under the layout root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateEntry {
    /// `YYYYMMDD`
    pub date: String,
    /// Folder name, `Lewis<YYYYMMDD>`
    pub folder: String,
    /// `YYYY-MM-DD`
    pub display: String,
}

impl DateEntry {
    /// Parse a folder name, accepting only `Lewis` followed by exactly eight digits.
    pub fn from_folder_name(name: &str) -> Option<Self> {
        let date = name.strip_prefix(DATE_FOLDER_PREFIX)?;
        if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            date: date.to_string(),
            folder: name.to_string(),
            display: format!("{}-{}-{}", &date[..4], &date[4..6], &date[6..]),
        })
    }
}

/// List capture dates under `layout_dir`, sorted chronologically.
///
/// An existing root without date folders yields an empty list; a missing
/// root is [`SiteError::NotFound`].
pub fn list_dates(layout_dir: &Path) -> SiteResult<Vec<DateEntry>> {
    if !layout_dir.exists() {
        return Err(SiteError::not_found("Layout directory not found"));
    }

    let mut dates = Vec::new();
    for entry in std::fs::read_dir(layout_dir)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if let Some(date) = DateEntry::from_folder_name(&name) {
            dates.push(date);
        }
    }

    dates.sort_by(|a, b| a.date.cmp(&b.date));
    debug!(count = dates.len(), root = %layout_dir.display(), "Listed capture dates");
    Ok(dates)
}
