//! Endpoint-level operations, independent of the HTTP layer.
//!
//! Every function here is synchronous and does blocking file I/O; HTTP
//! handlers run them on the blocking thread pool.

pub mod click;
pub mod images;
pub mod layout;

pub use click::tracker_at_pixel;
pub use images::{layout_image, tracker_image};
pub use layout::{available_dates, layout_image_url, site_layout, SiteLayout};
