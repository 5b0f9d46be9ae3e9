//! Site layout directory conventions.
//!
//! ```text
//! layout_data/
//! ├── Lewis-NY_construction_AI_corrected_1.json   tracker boundaries
//! └── Lewis20251009/                               one folder per capture date
//!     ├── <date_match>.jpg                         base image
//!     ├── <date_match>_web.jpg                     downscaled cache
//!     ├── <date_match>_stage_status_overlay.jpg    annotated reference
//!     ├── <date_match>.tif                         georeferenced raster
//!     ├── <date_match>_tracker_stages.csv          tracker status
//!     └── <date_match>/<id>_boundary.tif           per-tracker rasters
//! ```

pub mod candidates;
pub mod dates;
pub mod folder;

pub use candidates::CandidatePaths;
pub use dates::{list_dates, DateEntry};
pub use folder::DateFolder;

/// Prefix of every capture-date folder name.
pub const DATE_FOLDER_PREFIX: &str = "Lewis";

/// Suffix of the downscaled web copy of a layout image.
pub const WEB_SUFFIX: &str = "_web.jpg";

/// Filename suffixes that mark a JPEG as something other than the base image.
pub const NON_BASE_SUFFIXES: [&str; 5] = [
    "_overlay.jpg",
    "_stage_overlay.jpg",
    "_status_overlay.jpg",
    "_stage_status_overlay.jpg",
    WEB_SUFFIX,
];
