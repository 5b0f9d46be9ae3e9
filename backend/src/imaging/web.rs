//! Browser-sized copies of layout images.
//!
//! Orthomosaic JPEGs routinely exceed what a browser will decode comfortably.
//! Sources over [`ImagePolicy::direct_serve_limit`] are served from a
//! `<stem>_web.jpg` sibling, created on first request and reused afterwards.
//! The sibling is written to a temporary file and renamed into place, so
//! concurrent first requests race harmlessly: the content is deterministic
//! and the last rename wins.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::open_unlimited;
use crate::config::ImagePolicy;
use crate::error::{SiteError, SiteResult};
use crate::layout::WEB_SUFFIX;

/// How a layout image request was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Source was small enough to serve as-is.
    Direct,
    /// An existing web copy was served without decoding the source.
    Hit,
    /// The web copy was created by this request.
    Created,
}

/// File to send, and how it was obtained.
///
/// The file is not read here; the HTTP layer streams it from `path`.
#[derive(Debug, Clone)]
pub struct WebImage {
    pub path: PathBuf,
    /// Size of the file at `path`, in bytes.
    pub len: u64,
    pub outcome: CacheOutcome,
}

impl WebImage {
    /// Read the whole file into memory.
    pub fn read(&self) -> SiteResult<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}

/// `<stem>_web.jpg` next to `source`.
pub fn web_variant_path(source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let web_name = match name.strip_suffix(".jpg") {
        Some(stem) => format!("{}{}", stem, WEB_SUFFIX),
        None => format!("{}{}", name, WEB_SUFFIX),
    };
    source.with_file_name(web_name)
}

/// Size that fits inside a `max_dimension` square, preserving aspect ratio.
///
/// Returns `None` when the image already fits. Dimensions are truncated and
/// never drop below one pixel.
pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> Option<(u32, u32)> {
    if width <= max_dimension && height <= max_dimension {
        return None;
    }
    let ratio = (max_dimension as f64 / width as f64).min(max_dimension as f64 / height as f64);
    let scaled = |side: u32| ((side as f64 * ratio) as u32).max(1);
    Some((scaled(width), scaled(height)))
}

/// Locate the file to serve for a layout image, downscaling oversized sources.
pub fn prepare_web_image(source: &Path, policy: &ImagePolicy) -> SiteResult<WebImage> {
    let size = std::fs::metadata(source)?.len();
    debug!(path = %source.display(), bytes = size, "Serving layout image");

    if size <= policy.direct_serve_limit {
        return Ok(WebImage {
            path: source.to_path_buf(),
            len: size,
            outcome: CacheOutcome::Direct,
        });
    }

    info!(
        path = %source.display(),
        bytes = size,
        limit = policy.direct_serve_limit,
        "Image too large, serving downscaled version"
    );
    let (path, outcome) = ensure_web_variant(source, policy)?;
    let len = std::fs::metadata(&path)?.len();
    debug!(path = %path.display(), bytes = len, ?outcome, "Serving downscaled version");
    Ok(WebImage { path, len, outcome })
}

/// Make sure the web copy of `source` exists, creating it if needed.
pub fn ensure_web_variant(source: &Path, policy: &ImagePolicy) -> SiteResult<(PathBuf, CacheOutcome)> {
    let target = web_variant_path(source);
    if target.exists() {
        return Ok((target, CacheOutcome::Hit));
    }

    let dir = target
        .parent()
        .ok_or_else(|| SiteError::format("image path", &target, "has no parent directory"))?;
    let mut staged = NamedTempFile::new_in(dir)?;

    let img = open_unlimited(source)?.decode()?;
    match fit_within(img.width(), img.height(), policy.web_max_dimension) {
        Some((width, height)) => {
            let resized = img.resize_exact(width, height, FilterType::Lanczos3).to_rgb8();
            let mut writer = BufWriter::new(staged.as_file_mut());
            let encoder = JpegEncoder::new_with_quality(&mut writer, policy.web_jpeg_quality);
            resized.write_with_encoder(encoder)?;
            writer.flush()?;
            drop(writer);
            info!(
                source = %source.display(),
                target = %target.display(),
                width,
                height,
                "Created downscaled version"
            );
        }
        None => {
            // Large file but small raster, e.g. a high-quality JPEG; copy verbatim.
            std::fs::copy(source, staged.path())?;
        }
    }

    staged.persist(&target).map_err(|e| SiteError::Io(e.error))?;
    Ok((target, CacheOutcome::Created))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_variant_path() {
        assert_eq!(
            web_variant_path(Path::new("/d/Lewis20251009/S1.jpg")),
            PathBuf::from("/d/Lewis20251009/S1_web.jpg")
        );
        assert_eq!(
            web_variant_path(Path::new("/d/S1_stage_overlay.jpg")),
            PathBuf::from("/d/S1_stage_overlay_web.jpg")
        );
    }

    #[test]
    fn test_fit_within() {
        assert_eq!(fit_within(4000, 3000, 4000), None);
        assert_eq!(fit_within(8000, 6000, 4000), Some((4000, 3000)));
        assert_eq!(fit_within(3000, 9000, 4000), Some((1333, 4000)));
        assert_eq!(fit_within(100_000, 10, 4000), Some((4000, 1)));
    }

    #[test]
    fn test_small_file_served_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S1.jpg");
        std::fs::write(&path, b"jpeg bytes").unwrap();

        let served = prepare_web_image(&path, &ImagePolicy::default()).unwrap();
        assert_eq!(served.outcome, CacheOutcome::Direct);
        assert_eq!(served.len, 10);
        assert_eq!(served.read().unwrap(), b"jpeg bytes");
        assert!(!web_variant_path(&path).exists());
    }

    #[test]
    fn test_existing_web_copy_is_a_hit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("S1.jpg");
        // Not a decodable JPEG: a hit must not decode the source
        std::fs::write(&path, vec![0u8; 64]).unwrap();
        std::fs::write(dir.path().join("S1_web.jpg"), b"cached").unwrap();

        let policy = ImagePolicy {
            direct_serve_limit: 8,
            ..ImagePolicy::default()
        };
        let served = prepare_web_image(&path, &policy).unwrap();
        assert_eq!(served.outcome, CacheOutcome::Hit);
        assert_eq!(served.read().unwrap(), b"cached");
    }
}
