//! Tracker metadata sources.
//!
//! Boundaries and statuses come from independent files and are joined by
//! tracker id only when a response is assembled; either side may lack ids the
//! other has.

pub mod boundaries;
pub mod status;

pub use boundaries::{load_tracker_boundaries, parse_tracker_boundaries};
pub use status::{load_tracker_status, parse_tracker_status, TrackerStatus, TrackerStatusMap};
