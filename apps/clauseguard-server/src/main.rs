//! ClauseGuard API server
//!
//! HTTP boundary for the contract risk-analysis engine. Provides REST
//! endpoints for:
//!
//! - Document analysis (`POST /analyze_document`)
//! - Identity sync passthrough (`POST /users/sync`)
//! - Health checks (`GET /health`)
//!
//! ## Architecture
//!
//! The server is a thin layer over `risk-engine`: multipart decoding, rate
//! limiting, CORS for the dashboard, and error mapping. All analysis state
//! is per-request; the process holds no cross-request mutable state.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use risk_engine::{EngineConfig, RiskEngine};

mod api;
mod error;
#[cfg(test)]
mod tests;

use api::{handle_analyze_document, handle_health, handle_user_sync};

/// Command-line arguments for the ClauseGuard server
#[derive(Parser, Debug)]
#[command(name = "clauseguard-server")]
#[command(about = "ClauseGuard contract risk-analysis server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Classification timeout in milliseconds
    #[arg(long, default_value = "30000")]
    timeout_ms: u64,

    /// Upload size cap in megabytes
    #[arg(long, default_value = "10")]
    max_upload_mb: usize,

    /// Worker pool size for per-clause classification (0 = available cores)
    #[arg(long, default_value = "0")]
    workers: usize,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RiskEngine>,
}

/// Build the application router. Kept separate from `main` so tests can
/// mount the same routes.
pub fn app(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/analyze_document", post(handle_analyze_document))
        .route("/users/sync", post(handle_user_sync))
        // Multipart framing adds overhead on top of the file itself.
        .layer(DefaultBodyLimit::max(max_upload_bytes + 64 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let max_upload_bytes = args.max_upload_mb * 1024 * 1024;
    let config = EngineConfig {
        max_file_bytes: max_upload_bytes,
        classification_timeout_ms: args.timeout_ms,
        max_workers: args.workers,
        ..EngineConfig::default()
    };
    let state = AppState {
        engine: Arc::new(RiskEngine::new(config)),
    };

    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit * 2)
            .finish()
            .expect("Failed to create rate limiter config"),
    );

    let app = app(state, max_upload_bytes).layer(GovernorLayer {
        config: governor_conf,
    });

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("ClauseGuard server listening on http://{}", addr);
    info!("Upload cap: {} MB", args.max_upload_mb);
    info!("Classification timeout: {}ms", args.timeout_ms);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);

    axum::serve(listener, app).await?;

    Ok(())
}
