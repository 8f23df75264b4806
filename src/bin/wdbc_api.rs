//! WDBC Scorer API Server
//!
//! REST API for the educational tumour score
//!
//! Usage:
//!   cargo run --bin wdbc_api
//!
//! Environment:
//!   PORT / WDBC_PORT       - Server port (default: 8080)
//!   WDBC_HOST              - Server host (default: 0.0.0.0)
//!   WDBC_RATE_LIMIT        - Requests per client per window (default: 100)
//!   WDBC_RATE_WINDOW_SECS  - Rate limit window (default: 60)
//!   WDBC_MAX_BATCH         - Max items per batch request (default: 100)
//!   RUST_LOG               - Log level (default: info)

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use wdbc_scorer::api::{create_router, start_cleanup_task, AppState};
use wdbc_scorer::utils::constants::{APP_NAME, APP_VERSION};
use wdbc_scorer::{PredictionTelemetry, ServerConfig};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    print_banner();

    let config = ServerConfig::from_env();

    // Initialize telemetry
    let telemetry = Arc::new(PredictionTelemetry::new());
    let telemetry_for_shutdown = telemetry.clone();

    // Create app state
    let state = Arc::new(AppState::new(telemetry, config.clone()));

    // Start background cleanup task for rate limiter
    start_cleanup_task(state.rate_limiter.clone());
    info!("🧹 Background cleanup task started");

    // Create router
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;

    info!("🚀 {} API starting on http://{}", APP_NAME, addr);
    info!(
        "   Rate limit: {} req / {}s, max batch: {}",
        config.rate_limit,
        config.rate_window.as_secs(),
        config.max_batch
    );
    info!("");
    info!("Endpoints:");
    info!("  POST /v1/predict          - Score four numeric measurements");
    info!("  POST /v1/predict/form     - Score raw form text (validated)");
    info!("  POST /v1/predict/batch    - Batch scoring (up to {} items)", config.max_batch);
    info!("  GET  /v1/fields           - Field metadata and reference ranges");
    info!("  GET  /v1/stats            - Aggregate counters");
    info!("  GET  /v1/health           - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // Graceful shutdown sequence
    info!("🛑 Shutdown signal received");
    let stats = telemetry_for_shutdown.get_stats();
    info!("   {}", stats.summary());
    info!("👋 {} API shutdown complete", APP_NAME);

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ╔══════════════════════════════════════════════════════════════╗
    ║                                                              ║
    ║                W D B C   S C O R E R   A P I                 ║
    ║                         v{:<10}                          ║
    ║                                                              ║
    ║        Educational logistic score - not a diagnosis          ║
    ║                                                              ║
    ╚══════════════════════════════════════════════════════════════╝
    "#,
        APP_VERSION
    );
}
