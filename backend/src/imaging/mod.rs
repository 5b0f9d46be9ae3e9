//! Image preparation for the browser.
//!
//! - [`web`]: downscaled, disk-cached copies of oversized layout JPEGs
//! - [`dimensions`]: original vs displayed image size for click scaling
//! - [`tracker`]: per-tracker GeoTIFF rendering to PNG data URLs

pub mod dimensions;
pub mod tracker;
pub mod web;

pub use dimensions::{display_dimensions, image_size, ImageDimensions};
pub use tracker::{normalize_bands, png_data_url, render_tracker_png};
pub use web::{ensure_web_variant, prepare_web_image, web_variant_path, CacheOutcome, WebImage};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::ImageReader;

use crate::error::SiteResult;

/// Open an image with decoder limits disabled.
///
/// Site orthomosaics are far beyond the codec's default allocation limit.
pub(crate) fn open_unlimited(path: &Path) -> SiteResult<ImageReader<BufReader<File>>> {
    let mut reader = ImageReader::open(path)?.with_guessed_format()?;
    reader.no_limits();
    Ok(reader)
}
