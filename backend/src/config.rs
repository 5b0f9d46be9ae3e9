//! Server configuration and environment variable handling.

use std::env;
use std::path::{Path, PathBuf};

/// Default boundary JSON filename, relative to the layout directory.
pub const DEFAULT_BOUNDARY_JSON: &str = "Lewis-NY_construction_AI_corrected_1.json";

/// Size and quality limits applied when preparing images for the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePolicy {
    /// Layout images larger than this many bytes are served downscaled.
    pub direct_serve_limit: u64,
    /// Longest side of a downscaled layout image, in pixels.
    pub web_max_dimension: u32,
    /// JPEG quality of downscaled layout images.
    pub web_jpeg_quality: u8,
    /// Longest side of a rendered tracker image, in pixels.
    pub tracker_max_dimension: u32,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            direct_serve_limit: 50 * 1024 * 1024,
            web_max_dimension: 4000,
            web_jpeg_quality: 85,
            tracker_max_dimension: 2000,
        }
    }
}

/// Site configuration, read once at startup and shared with every handler.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Root holding the `Lewis<YYYYMMDD>` date folders and the boundary JSON.
    pub layout_dir: PathBuf,
    /// Root of the per-tracker raster output tree.
    pub output_dir: PathBuf,
    /// Fallback directory for full-site GeoTIFFs.
    pub tifs_dir: PathBuf,
    /// Tracker boundary JSON.
    pub boundary_json: PathBuf,
    pub host: String,
    pub port: u16,
    pub images: ImagePolicy,
}

impl SiteConfig {
    /// Configuration with explicit directories and default server settings.
    pub fn new(
        layout_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        tifs_dir: impl Into<PathBuf>,
    ) -> Self {
        let layout_dir = layout_dir.into();
        let boundary_json = layout_dir.join(DEFAULT_BOUNDARY_JSON);
        Self {
            layout_dir,
            output_dir: output_dir.into(),
            tifs_dir: tifs_dir.into(),
            boundary_json,
            host: "0.0.0.0".to_string(),
            port: 5000,
            images: ImagePolicy::default(),
        }
    }

    pub fn with_images(mut self, images: ImagePolicy) -> Self {
        self.images = images;
        self
    }

    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `BASE_DIR` (optional, default: parent of the working directory)
    /// - `LAYOUT_DIR` (optional, default: `./layout_data`)
    /// - `OUTPUT_DIR` (optional, default: `$BASE_DIR/Output_Lewis`)
    /// - `LEWISTIFS_DIR` (optional, default: `$BASE_DIR/Lewistifs`)
    /// - `BOUNDARY_JSON` (optional, default: `Lewis-NY_construction_AI_corrected_1.json`,
    ///   resolved against `LAYOUT_DIR` when relative)
    /// - `HOST` (optional, default: `0.0.0.0`)
    /// - `PORT` (optional, default: 5000)
    ///
    /// # Errors
    /// Returns an error if `PORT` is set but is not a valid port number, or
    /// if the working directory cannot be determined.
    pub fn from_env() -> Result<Self, String> {
        let cwd = env::current_dir()
            .map_err(|e| format!("Cannot determine working directory: {}", e))?;
        Self::from_vars(&cwd, |key| env::var(key).ok())
    }

    /// Same as [`SiteConfig::from_env`] with an explicit working directory and
    /// variable lookup.
    pub fn from_vars<F>(cwd: &Path, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let base_dir = var("BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| cwd.parent().unwrap_or(cwd).to_path_buf());
        let layout_dir = var("LAYOUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| cwd.join("layout_data"));
        let output_dir = var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| base_dir.join("Output_Lewis"));
        let tifs_dir = var("LEWISTIFS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| base_dir.join("Lewistifs"));
        let boundary_json = layout_dir.join(
            var("BOUNDARY_JSON").unwrap_or_else(|| DEFAULT_BOUNDARY_JSON.to_string()),
        );

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match var("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| "PORT must be a valid port number".to_string())?,
            None => 5000,
        };

        Ok(Self {
            layout_dir,
            output_dir,
            tifs_dir,
            boundary_json,
            host,
            port,
            images: ImagePolicy::default(),
        })
    }

    /// Path of the folder holding one capture date's assets.
    pub fn date_folder_path(&self, date: &str) -> PathBuf {
        self.layout_dir.join(date_folder_name(date))
    }
}

/// `Lewis<YYYYMMDD>` folder name for a capture date.
pub fn date_folder_name(date: &str) -> String {
    format!("{}{}", crate::layout::DATE_FOLDER_PREFIX, date)
}
