//! Geographic core: raster georeferencing and tracker lookup.
//!
//! A click on the site image is resolved in two steps:
//!
//! ```text
//! pixel (col, row) ──AffineTransform──▶ (lon, lat) ──BoundaryIndex──▶ tracker id
//! ```

pub mod boundary;
pub mod transform;

pub use boundary::{BoundaryIndex, TrackerBoundary};
pub use transform::{AffineTransform, GeoRaster};
