//! Click resolution: image pixel to tracker id.

use tracing::debug;

use crate::config::SiteConfig;
use crate::error::SiteResult;
use crate::geo::GeoRaster;
use crate::layout::DateFolder;
use crate::metadata::load_tracker_boundaries;

/// Tracker under pixel `(x, y)` of the date's site raster, if any.
///
/// `x` is the column and `y` the row, both in original raster pixels. The
/// pixel center is used, so `(0, 0)` refers to the middle of the top-left
/// pixel.
pub fn tracker_at_pixel(
    config: &SiteConfig,
    date: &str,
    x: f64,
    y: f64,
) -> SiteResult<Option<String>> {
    let folder = DateFolder::open(config, date)?;
    let date_match = folder.asset_stem()?;
    let raster_path = folder.site_raster_path(&config.tifs_dir, &date_match)?;
    let raster = GeoRaster::open(&raster_path)?;

    let (lon, lat) = raster.transform.pixel_center_to_geo(x, y);

    let boundaries = load_tracker_boundaries(&config.boundary_json)?;
    let tracker = boundaries.find_containing(lon, lat).map(str::to_string);

    debug!(date, x, y, lon, lat, ?tracker, "Resolved click");
    Ok(tracker)
}
