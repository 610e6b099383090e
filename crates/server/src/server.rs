//! Server initialization and routing
//!
//! Router setup, middleware stack, logging initialization and graceful shutdown.

use crate::config::ServerConfig;
use crate::middleware::{function_key_auth, log_requests, request_id};
use crate::routes::{api_info, embedding, health, not_found};
use crate::state::ServerState;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// - Public routes: /, /health, /ready, /metrics
/// - Protected routes: the embedding skill, function key required
///
/// Middleware (outermost first): trace, request id, request logging, CORS,
/// compression, timeout (only when `timeout_secs` is set), body limit, then
/// function key auth on protected routes.
pub fn build_router(state: Arc<ServerState>) -> Router {
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    let public_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics));

    let protected_routes = Router::new()
        .route("/get_custom_embedding", post(embedding::get_custom_embedding))
        .route(
            "/api/get_custom_embedding",
            post(embedding::get_custom_embedding),
        )
        .layer(from_fn_with_state(state.clone(), function_key_auth));

    let router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.config.max_body_size()));

    let router = match state.config.timeout() {
        Some(timeout) => router.layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        )),
        None => router,
    };

    router
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Install the JSON `tracing` subscriber using `log_level` as the filter.
pub fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();
}

/// Start the embedding server
///
/// Initializes logging, applies config fallbacks (token, ephemeral function
/// key), builds the provider, and serves until SIGTERM or Ctrl+C.
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    init_tracing(&config.log_level);
    health::mark_started();

    let config = config.with_env_fallbacks(std::env::var("HF_TOKEN").ok());

    let state = Arc::new(ServerState::new(config.clone())?);
    let app = build_router(state);

    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        "Starting embedding server on {} with {} function keys",
        addr,
        config.function_keys.len()
    );
    match config.timeout_secs {
        Some(secs) => tracing::info!("Request timeout: {}s", secs),
        None => tracing::info!("Request timeout: none"),
    }
    tracing::info!(
        "Max body: {}MB, CORS: {}",
        config.max_body_size_mb,
        config.enable_cors
    );
    tracing::info!(
        provider = ?config.provider.kind,
        model = %config.provider.model_id,
        wait_for_model = config.provider.wait_for_model,
        fields = ?config.enrichment.fields,
        "Embedding provider configured"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
