//! Original and displayed size of the base image.
//!
//! The browser may be showing the `_web.jpg` copy. Clicks arrive in displayed
//! pixels and are multiplied by `scale_factor` to get original pixels.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{open_unlimited, web_variant_path};
use crate::error::SiteResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub original_width: u32,
    pub original_height: u32,
    pub display_width: u32,
    pub display_height: u32,
    /// `original_width / display_width`
    pub scale_factor: f64,
}

/// Image size read from the header, without decoding pixels.
pub fn image_size(path: &Path) -> SiteResult<(u32, u32)> {
    Ok(open_unlimited(path)?.into_dimensions()?)
}

/// Dimensions of `base_image` and of its web copy, if one exists.
pub fn display_dimensions(base_image: &Path) -> SiteResult<ImageDimensions> {
    let (original_width, original_height) = image_size(base_image)?;

    let web = web_variant_path(base_image);
    let (display_width, display_height) = if web.exists() {
        image_size(&web)?
    } else {
        (original_width, original_height)
    };

    let scale_factor = if display_width == 0 {
        1.0
    } else {
        original_width as f64 / display_width as f64
    };

    Ok(ImageDimensions {
        original_width,
        original_height,
        display_width,
        display_height,
        scale_factor,
    })
}
