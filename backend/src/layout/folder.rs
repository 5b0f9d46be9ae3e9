//! Asset discovery inside one capture-date folder.

use std::path::{Component, Path, PathBuf};

use super::candidates::CandidatePaths;
use super::dates::DateEntry;
use super::NON_BASE_SUFFIXES;
use crate::config::{date_folder_name, SiteConfig};
use crate::error::{SiteError, SiteResult};

/// A capture-date folder known to exist.
#[derive(Debug, Clone)]
pub struct DateFolder {
    /// `YYYYMMDD` as given by the client.
    pub date: String,
    pub path: PathBuf,
}

impl DateFolder {
    /// Locate the folder for `date`.
    ///
    /// `date` must be exactly eight ASCII digits (BadRequest otherwise), so it
    /// can never name anything but a direct child of the layout root. A
    /// well-formed date without a folder is NotFound.
    pub fn open(config: &SiteConfig, date: &str) -> SiteResult<Self> {
        if DateEntry::from_folder_name(&date_folder_name(date)).is_none() {
            return Err(SiteError::bad_request(format!("Invalid date: {}", date)));
        }
        let path = config.date_folder_path(date);
        if !path.is_dir() {
            return Err(SiteError::not_found(format!(
                "Date folder not found: {}",
                date_folder_name(date)
            )));
        }
        Ok(Self {
            date: date.to_string(),
            path,
        })
    }

    /// Names of all `.jpg` files in the folder, sorted.
    pub fn jpeg_names(&self) -> SiteResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.path)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".jpg") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Filename of the base (un-annotated, full-resolution) image.
    pub fn base_image(&self) -> SiteResult<String> {
        self.jpeg_names()?
            .into_iter()
            .find(|name| is_base_image(name))
            .ok_or_else(|| {
                SiteError::not_found(format!("Base image not found for date {}", self.date))
            })
    }

    /// Annotated reference image, preferring the stage+status rendering.
    pub fn overlay_image(&self) -> SiteResult<Option<String>> {
        let names = self.jpeg_names()?;
        let stage_status = names
            .iter()
            .find(|name| name.ends_with("_stage_status_overlay.jpg"));
        let stage = names.iter().find(|name| {
            name.ends_with("_stage_overlay.jpg") && !name.ends_with("_stage_status_overlay.jpg")
        });
        Ok(stage_status.or(stage).cloned())
    }

    /// Shared asset stem (`date_match`) derived from the first non-web JPEG.
    ///
    /// Unlike [`DateFolder::base_image`] this accepts overlay renderings too,
    /// so a folder holding only annotated images still resolves.
    pub fn asset_stem(&self) -> SiteResult<String> {
        self.jpeg_names()?
            .into_iter()
            .find(|name| !name.ends_with(super::WEB_SUFFIX))
            .map(|name| strip_asset_suffixes(&name).to_string())
            .ok_or_else(|| {
                SiteError::not_found(format!("No image files found for date {}", self.date))
            })
    }

    pub fn status_csv_path(&self, date_match: &str) -> PathBuf {
        self.path.join(format!("{}_tracker_stages.csv", date_match))
    }

    /// Full-site GeoTIFF locations: the date folder, then the shared TIFF directory.
    pub fn site_raster_candidates<'a>(
        &'a self,
        tifs_dir: &'a Path,
        date_match: &'a str,
    ) -> CandidatePaths<'a> {
        let file_name = format!("{}.tif", date_match);
        let fallback_name = file_name.clone();
        CandidatePaths::new()
            .then("date folder", move || self.path.join(&file_name))
            .then("tifs dir", move || tifs_dir.join(&fallback_name))
    }

    pub fn site_raster_path(&self, tifs_dir: &Path, date_match: &str) -> SiteResult<PathBuf> {
        self.site_raster_candidates(tifs_dir, date_match)
            .first_existing()
            .ok_or_else(|| SiteError::not_found("TIFF file not found"))
    }

    /// Per-tracker raster locations in precedence order.
    ///
    /// The date folder's `<date_match>/` subfolder wins; the output tree is
    /// tried flat and then nested under the 5- and 6-character id prefixes
    /// (`A01T01`, `A01T01R`-style grouping folders).
    pub fn tracker_raster_candidates<'a>(
        &'a self,
        output_dir: &'a Path,
        date_match: &'a str,
        tracker_id: &'a str,
    ) -> CandidatePaths<'a> {
        let file_name = tracker_raster_name(tracker_id);
        let (f1, f2, f3, f4) = (
            file_name.clone(),
            file_name.clone(),
            file_name.clone(),
            file_name,
        );
        CandidatePaths::new()
            .then("layout subfolder", move || {
                self.path.join(date_match).join(&f1)
            })
            .then("output dir", move || output_dir.join(date_match).join(&f2))
            .then("output dir, 5-char group", move || {
                output_dir
                    .join(date_match)
                    .join(id_prefix(tracker_id, 5))
                    .join(&f3)
            })
            .then("output dir, 6-char group", move || {
                output_dir
                    .join(date_match)
                    .join(id_prefix(tracker_id, 6))
                    .join(&f4)
            })
    }

    /// Resolve a client-supplied filename inside this folder.
    ///
    /// Only plain relative components are allowed; anything that could step
    /// outside the folder is a bad request.
    pub fn resolve_file(&self, filename: &str) -> SiteResult<PathBuf> {
        let relative = Path::new(filename);
        let is_plain = relative.components().count() > 0
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(SiteError::bad_request(format!(
                "Invalid image path: {}",
                filename
            )));
        }

        let path = self.path.join(relative);
        if !path.is_file() {
            return Err(SiteError::not_found(format!(
                "Image not found: {}",
                path.display()
            )));
        }
        Ok(path)
    }
}

/// True for a JPEG that carries no overlay or web-cache suffix.
pub fn is_base_image(name: &str) -> bool {
    name.ends_with(".jpg") && !NON_BASE_SUFFIXES.iter().any(|s| name.ends_with(s))
}

/// `date_match` of a base image: its name without `.jpg`.
pub fn date_match_of(base_image: &str) -> &str {
    base_image.strip_suffix(".jpg").unwrap_or(base_image)
}

/// Strip the longest known overlay suffix, or `.jpg`, from an image name.
pub fn strip_asset_suffixes(name: &str) -> &str {
    let mut suffixes: Vec<&str> = NON_BASE_SUFFIXES.to_vec();
    suffixes.sort_by_key(|s| std::cmp::Reverse(s.len()));
    suffixes
        .into_iter()
        .chain(std::iter::once(".jpg"))
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name)
}

/// Reject tracker ids that are not a single plain path component.
pub fn check_tracker_id(tracker_id: &str) -> SiteResult<()> {
    let mut components = Path::new(tracker_id).components();
    let is_plain = matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none()
        && !tracker_id.contains(['/', '\\']);
    if is_plain {
        Ok(())
    } else {
        Err(SiteError::bad_request(format!(
            "Invalid tracker id: {}",
            tracker_id
        )))
    }
}

pub fn tracker_raster_name(tracker_id: &str) -> String {
    format!("{}_boundary.tif", tracker_id)
}

/// First `len` characters of a tracker id, or the whole id when shorter.
fn id_prefix(tracker_id: &str, len: usize) -> String {
    tracker_id.chars().take(len).collect()
}
