//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer. Service calls read and decode files, so they run on the blocking
//! thread pool.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use tokio_util::io::ReaderStream;

use super::dto::{
    ClickQuery, ClickResponse, DatesResponse, HealthResponse, SiteLayout, TrackerImageResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::error::SiteResult;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Run a blocking service call with the shared configuration.
async fn run_blocking<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&crate::config::SiteConfig) -> SiteResult<T> + Send + 'static,
{
    let config = state.config.clone();
    let result = tokio::task::spawn_blocking(move || f(config.as_ref())).await?;
    Ok(result?)
}

// =============================================================================
// Pages
// =============================================================================

/// GET /
///
/// Single-page site viewer.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health
pub async fn health_check() -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

// =============================================================================
// Site data
// =============================================================================

/// GET /api/dates
///
/// List capture dates, oldest first.
pub async fn list_dates(State(state): State<AppState>) -> HandlerResult<DatesResponse> {
    let dates = run_blocking(&state, services::available_dates).await?;
    Ok(Json(DatesResponse { dates }))
}

/// GET /api/layout/{date}
///
/// Boundaries, tracker status, raster transform and image metadata for a date.
pub async fn get_layout(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> HandlerResult<SiteLayout> {
    let layout = run_blocking(&state, move |config| services::site_layout(config, &date)).await?;
    Ok(Json(layout))
}

/// GET /api/image/layout/{date}/{*filename}
///
/// Layout JPEG, streamed from disk; oversized sources are served from their
/// `_web.jpg` copy.
pub async fn get_layout_image(
    State(state): State<AppState>,
    Path((date, filename)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let image = run_blocking(&state, move |config| {
        services::layout_image(config, &date, &filename)
    })
    .await?;

    let file = tokio::fs::File::open(&image.path)
        .await
        .map_err(|e| AppError::Site(e.into()))?;
    let body = Body::from_stream(ReaderStream::new(file));

    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
            (header::CONTENT_LENGTH, image.len.to_string()),
        ],
        body,
    )
        .into_response())
}

/// GET /api/tracker/{date}/{tracker_id}
///
/// Tracker raster crop as a PNG data URL.
pub async fn get_tracker_image(
    State(state): State<AppState>,
    Path((date, tracker_id)): Path<(String, String)>,
) -> HandlerResult<TrackerImageResponse> {
    let image = run_blocking(&state, move |config| {
        services::tracker_image(config, &date, &tracker_id)
    })
    .await?;
    Ok(Json(TrackerImageResponse { image }))
}

/// GET /api/click?x=&y=&date=
///
/// Tracker under an original-image pixel, or `null`.
pub async fn handle_click(
    State(state): State<AppState>,
    Query(query): Query<ClickQuery>,
) -> HandlerResult<ClickResponse> {
    let request = query.validate().map_err(AppError::BadRequest)?;
    let tracker_id = run_blocking(&state, move |config| {
        services::tracker_at_pixel(config, &request.date, request.x, request.y)
    })
    .await?;
    Ok(Json(ClickResponse { tracker_id }))
}
