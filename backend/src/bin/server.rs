//! Tracker Site HTTP Server Binary
//!
//! This is the main entry point for the tracker site viewer.
//! It reads the site configuration, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! LAYOUT_DIR=/data/layout_data cargo run --bin tracker-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 5000)
//! - `BASE_DIR`, `LAYOUT_DIR`, `OUTPUT_DIR`, `LEWISTIFS_DIR`, `BOUNDARY_JSON`:
//!   site directories, see [`tracker_site::SiteConfig::from_env`]
//! - `RUST_LOG`: Log filter (default: info)

use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tracker_site::http::{create_router, AppState};
use tracker_site::SiteConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let config = SiteConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;

    info!("Starting Tracker Site Server");
    info!("Layout Directory: {}", config.layout_dir.display());
    info!("Output Directory: {}", config.output_dir.display());
    info!("Lewistifs Directory: {}", config.tifs_dir.display());
    info!("Boundary JSON: {}", config.boundary_json.display());
    if !config.layout_dir.exists() {
        warn!("Layout directory does not exist; /api/dates will return 404");
    }

    // Determine bind address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    // Create router with all endpoints
    let app = create_router(AppState::new(config));

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
