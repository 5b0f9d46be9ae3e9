//! # Tracker Site Backend
//!
//! Construction-progress imagery server for a solar-tracker site.
//!
//! The crate serves date-indexed aerial imagery of a single site, the
//! geographic rectangle of every tracker, and each tracker's construction
//! stage and status, and answers "which tracker is under this pixel".
//!
//! ## Features
//!
//! - **Georeferencing**: affine pixel/geographic transforms read from GeoTIFF tags
//! - **Tracker lookup**: point-in-rectangle search over tracker boundaries
//! - **Imaging**: downscaled web copies of large orthomosaics, tracker raster rendering
//! - **HTTP API**: JSON endpoints and a single-page viewer
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`geo`]: Affine transforms and the tracker boundary index
//! - [`layout`]: Date folder and asset naming conventions
//! - [`metadata`]: Boundary JSON and status CSV loaders
//! - [`imaging`]: Image downscaling, dimension probing and raster rendering
//! - [`services`]: Endpoint-level operations
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`config`]: Environment-driven configuration

pub mod config;
pub mod error;
pub mod geo;
pub mod imaging;
pub mod layout;
pub mod metadata;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

pub use config::{ImagePolicy, SiteConfig};
pub use error::{SiteError, SiteResult};
