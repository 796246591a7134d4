//! Fullstack server: serves the rendered app, its assets and server
//! functions, plus a status endpoint.

use anyhow::Result;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config;

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "roomfinder_web=debug,tower_http=debug";

/// Install the tracing subscriber. Safe to call more than once.
pub fn init_logging() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub api_base: String,
}

/// GET /status
pub async fn status_handler() -> Json<StatusResponse> {
    let api_base = config::load_config()
        .map(|c| c.api_base)
        .unwrap_or_else(|_| config::DEFAULT_API_BASE.to_string());
    Json(StatusResponse {
        service: "roomfinder-web",
        version: env!("CARGO_PKG_VERSION"),
        api_base,
    })
}

/// Routes owned by this server (everything except the Dioxus app).
pub fn api_routes<S: Clone + Send + Sync + 'static>() -> Router<S> {
    Router::new().route("/status", get(status_handler))
}

pub async fn serve() -> Result<()> {
    use dioxus::server::{DioxusRouterExt, ServeConfig};

    let config = config::load_config()?;
    tracing::info!(api_base = %config.api_base, channel_path = %config.channel_path, "Configuration loaded");

    let router = api_routes()
        .serve_dioxus_application(ServeConfig::new(), App)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}

/// Blocking entry point for the server binary.
pub fn run() -> Result<()> {
    init_logging();
    tracing::info!("Starting Room Finder web");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(serve())
}
