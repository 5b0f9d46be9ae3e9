//! HTTP server for the tracker site viewer.
//!
//! Axum handlers expose site imagery, tracker boundaries and click lookups
//! as a JSON API, plus the single-page viewer at `/`.
//!
//! Request flow:
//!
//! ```text
//! handlers ──spawn_blocking──▶ services ──▶ layout / metadata / geo / imaging
//!    │                            │
//!    └── AppError ◀── SiteError ──┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
