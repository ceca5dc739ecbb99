//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::middleware::{
    access_control_middleware, path_guard_middleware, ObservabilityLayer, SanitizedMakeSpan,
};
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::{middleware::from_fn, middleware::from_fn_with_state, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

/// Bind the HTTP listener and serve until a shutdown signal arrives.
pub async fn run(config: Config, prometheus: Option<PrometheusHandle>) -> Result<()> {
    let http_addr = config.http_addr();
    if !config.frontend_dir.join("index.html").is_file() {
        tracing::warn!(
            dir = %config.frontend_dir.display(),
            "Frontend directory has no index.html, page requests will 404"
        );
    }

    let app = build_router(AppState::new(config, prometheus));

    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", http_addr))?;
    info!("HTTP server started on {}", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// Build the HTTP router.
///
/// `/health` and `/metrics` are answered directly. Every other path goes
/// through the access layer and is then served from the frontend bundle,
/// falling back to `index.html` for client-side routes.
pub fn build_router(state: AppState) -> Router {
    let frontend_dir = &state.config.frontend_dir;
    let frontend = ServeDir::new(frontend_dir)
        .fallback(ServeFile::new(frontend_dir.join("index.html")));

    let pages = Router::new()
        .fallback_service(frontend)
        .layer(CompressionLayer::new())
        .layer(from_fn_with_state(
            state.access.clone(),
            access_control_middleware,
        ));

    let metrics = Router::new()
        .route("/metrics", get(api::metrics::metrics_handler))
        .with_state(state.prometheus.clone());

    let routes = state.access.policy().routes().clone();

    Router::new()
        .route("/health", get(api::health::health))
        .merge(metrics)
        .fallback_service(pages)
        // Add middleware
        .layer(from_fn(path_guard_middleware))
        .layer(ObservabilityLayer::new(routes))
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
