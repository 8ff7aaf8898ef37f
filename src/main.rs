//! Influencer Analyzer - engagement metrics for public Instagram profiles.
//!
//! # Endpoints
//!
//! - `GET /` - Analyzer page
//! - `POST /search` - Submit a username from the page
//! - `GET /api/state` - Current search state as JSON
//! - `POST /api/search` - Submit a username as JSON
//! - `GET /health` - Health check
//!
//! # Configuration
//!
//! - `ANALYZER_PORT` - Listen port (default 3000)
//! - `ANALYZER_INSTAGRAM_BASE_URL` - Instagram base URL (default `https://www.instagram.com`)
//! - `ANALYZER_INSTAGRAM_SESSION` - Optional `sessionid` cookie for logged-in requests
//! - `RUST_LOG` - Log filter

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get, routing::post};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use influencer_analyzer::api::{AppState, get_state, health_check, index, post_search, submit_search};
use influencer_analyzer::controller::SearchController;
use influencer_analyzer::provider::InstagramClient;

/// Default port if not specified via environment variable.
const DEFAULT_PORT: u16 = 3000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing with environment filter
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("influencer_analyzer=info".parse()?))
        .init();

    // Load configuration from environment
    let port: u16 = env::var("ANALYZER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let client = match env::var("ANALYZER_INSTAGRAM_BASE_URL") {
        Ok(base_url) => InstagramClient::with_base_url(&base_url),
        Err(_) => InstagramClient::new(),
    }
    .with_session(env::var("ANALYZER_INSTAGRAM_SESSION").ok());

    info!(port, "Starting Influencer Analyzer");

    let state = AppState {
        controller: SearchController::new(Arc::new(client)),
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/search", post(submit_search))
        .route("/api/state", get(get_state))
        .route("/api/search", post(post_search))
        .route("/health", get(health_check))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Influencer Analyzer is listening");

    axum::serve(listener, app).await?;

    Ok(())
}
