//! Route table and middleware stack.

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Build the application router: viewer page, health check and `/api` routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive, the viewer may be hosted separately
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/dates", get(handlers::list_dates))
        .route("/layout/{date}", get(handlers::get_layout))
        .route("/image/layout/{date}/{*filename}", get(handlers::get_layout_image))
        .route("/tracker/{date}/{tracker_id}", get(handlers::get_tracker_image))
        .route("/click", get(handlers::handle_click));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
