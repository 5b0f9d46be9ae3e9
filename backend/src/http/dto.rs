//! Data Transfer Objects for the HTTP API.
//!
//! The layout payload and date entries are serialized straight from the
//! service types; this module holds the small request/response wrappers.

use serde::{Deserialize, Serialize};

pub use crate::layout::DateEntry;
pub use crate::services::SiteLayout;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Response for `GET /api/dates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatesResponse {
    /// Capture dates, oldest first
    pub dates: Vec<DateEntry>,
}

/// Query parameters for `GET /api/click`.
///
/// Kept as raw strings so missing and malformed values can be reported as
/// 400 with a specific message instead of the extractor's generic rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClickQuery {
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub y: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// Validated click request.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickRequest {
    pub x: f64,
    pub y: f64,
    pub date: String,
}

impl ClickQuery {
    /// Validate into a [`ClickRequest`], returning the 400 message on failure.
    pub fn validate(self) -> Result<ClickRequest, String> {
        let x = parse_coordinate("x", self.x.as_deref())?;
        let y = parse_coordinate("y", self.y.as_deref())?;
        let date = self
            .date
            .filter(|d| !d.is_empty())
            .ok_or_else(|| "Date required".to_string())?;
        Ok(ClickRequest { x, y, date })
    }
}

fn parse_coordinate(name: &str, raw: Option<&str>) -> Result<f64, String> {
    let raw = raw.ok_or_else(|| format!("Missing query parameter: {}", name))?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid {} coordinate: {}", name, raw))
}

/// Response for `GET /api/click`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickResponse {
    /// Tracker under the clicked pixel, `null` when none
    pub tracker_id: Option<String>,
}

/// Response for `GET /api/tracker/{date}/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerImageResponse {
    /// `data:image/png;base64,...`
    pub image: String,
}
