//! Layout image and tracker image retrieval.

use tracing::{debug, warn};

use crate::config::SiteConfig;
use crate::error::{SiteError, SiteResult};
use crate::imaging::{png_data_url, prepare_web_image, render_tracker_png, WebImage};
use crate::layout::folder::check_tracker_id;
use crate::layout::DateFolder;

/// Bytes of a layout image, downscaled and cached when oversized.
pub fn layout_image(config: &SiteConfig, date: &str, filename: &str) -> SiteResult<WebImage> {
    let folder = DateFolder::open(config, date)?;
    let path = folder.resolve_file(filename)?;
    prepare_web_image(&path, &config.images)
}

/// PNG data URL for a tracker's raster crop on `date`.
///
/// Candidate locations are tried in precedence order; one that exists but
/// fails to decode is logged and skipped.
pub fn tracker_image(config: &SiteConfig, date: &str, tracker_id: &str) -> SiteResult<String> {
    check_tracker_id(tracker_id)?;
    let folder = DateFolder::open(config, date)?;
    let date_match = folder.asset_stem()?;
    let candidates = folder.tracker_raster_candidates(&config.output_dir, &date_match, tracker_id);

    let rendered = candidates.first_accepted(|path| {
        match render_tracker_png(path, config.images.tracker_max_dimension) {
            Ok(png) => Some(png),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Error converting tracker TIFF");
                None
            }
        }
    });

    match rendered {
        Some(png) => {
            debug!(date, tracker_id, bytes = png.len(), "Rendered tracker image");
            Ok(png_data_url(&png))
        }
        None => Err(SiteError::TrackerImageNotFound {
            message: format!(
                "Tracker image not found: {} for date {}",
                tracker_id, date
            ),
            expected_path: candidates.primary().unwrap_or_default(),
        }),
    }
}
