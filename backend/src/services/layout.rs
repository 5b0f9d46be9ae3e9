//! Layout payload for one capture date.

use serde::Serialize;
use tracing::info;

use crate::config::SiteConfig;
use crate::error::SiteResult;
use crate::geo::{AffineTransform, BoundaryIndex, GeoRaster};
use crate::imaging::display_dimensions;
use crate::layout::folder::date_match_of;
use crate::layout::{list_dates, DateEntry, DateFolder};
use crate::metadata::{load_tracker_boundaries, load_tracker_status, TrackerStatusMap};

/// Everything the viewer needs to draw one date.
#[derive(Debug, Clone, Serialize)]
pub struct SiteLayout {
    pub boundaries: BoundaryIndex,
    pub tracker_info: TrackerStatusMap,
    pub transform: AffineTransform,
    pub tif_width: u32,
    pub tif_height: u32,
    /// URL of the base image.
    pub base_image: String,
    pub original_image_width: u32,
    pub original_image_height: u32,
    pub display_image_width: u32,
    pub display_image_height: u32,
    pub image_scale_factor: f64,
    pub date: String,
    /// URL of the annotated reference image, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_image: Option<String>,
}

/// URL under which a layout image is served.
pub fn layout_image_url(date: &str, filename: &str) -> String {
    format!("/api/image/layout/{}/{}", date, filename)
}

/// Capture dates available on this site.
pub fn available_dates(config: &SiteConfig) -> SiteResult<Vec<DateEntry>> {
    list_dates(&config.layout_dir)
}

/// Assemble the layout payload for `date`.
pub fn site_layout(config: &SiteConfig, date: &str) -> SiteResult<SiteLayout> {
    let folder = DateFolder::open(config, date)?;
    let base_image = folder.base_image()?;
    let date_match = date_match_of(&base_image);
    let overlay_image = folder.overlay_image()?;

    let boundaries = load_tracker_boundaries(&config.boundary_json)?;
    let tracker_info = load_tracker_status(&folder.status_csv_path(date_match))?;

    let raster_path = folder.site_raster_path(&config.tifs_dir, date_match)?;
    let raster = GeoRaster::open(&raster_path)?;

    let dims = display_dimensions(&folder.path.join(&base_image))?;

    info!(
        date,
        trackers = boundaries.len(),
        statuses = tracker_info.len(),
        raster = %raster_path.display(),
        scale = dims.scale_factor,
        "Assembled site layout"
    );

    Ok(SiteLayout {
        boundaries,
        tracker_info,
        transform: raster.transform,
        tif_width: raster.width,
        tif_height: raster.height,
        base_image: layout_image_url(date, &base_image),
        original_image_width: dims.original_width,
        original_image_height: dims.original_height,
        display_image_width: dims.display_width,
        display_image_height: dims.display_height,
        image_scale_factor: dims.scale_factor,
        date: date.to_string(),
        overlay_image: overlay_image.map(|name| layout_image_url(date, &name)),
    })
}
