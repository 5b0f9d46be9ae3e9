//! Error types for site asset operations.
//!
//! Every operation in the crate reports failures through [`SiteError`]. The
//! variants map one-to-one onto the HTTP status classes exposed by the API:
//! missing assets become 404, malformed requests 400, and everything else
//! (decode failures, unreadable metadata) 500.

use std::path::{Path, PathBuf};

/// Result type for site operations.
pub type SiteResult<T> = Result<T, SiteError>;

/// Error type for site operations.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// A directory or file the request depends on does not exist.
    #[error("{0}")]
    NotFound(String),

    /// No tracker raster exists at any of the candidate locations.
    #[error("{message}")]
    TrackerImageNotFound {
        message: String,
        /// Highest-precedence location the raster was expected at.
        expected_path: PathBuf,
    },

    /// The request is missing a parameter or carries an unusable one.
    #[error("{0}")]
    BadRequest(String),

    /// A file exists but its contents cannot be interpreted.
    #[error("Invalid {kind} {}: {message}", path.display())]
    Format {
        kind: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TIFF decode error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SiteError {
    pub fn not_found(message: impl Into<String>) -> Self {
        SiteError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        SiteError::BadRequest(message.into())
    }

    pub fn format(kind: &'static str, path: &Path, message: impl Into<String>) -> Self {
        SiteError::Format {
            kind,
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// True when the error means "the thing asked for is not there".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SiteError::NotFound(_) | SiteError::TrackerImageNotFound { .. }
        )
    }
}
