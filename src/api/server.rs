//! HTTP server implementation for the outline API

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeFile,
    trace::TraceLayer,
};
use tracing::info;

use super::handlers;
use crate::core::{Error, Result};
use crate::outline::OutlineStore;

/// Creates the main application router with all routes and middleware
pub fn create_app(store: Arc<OutlineStore>, asset_dir: &Path) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        // Static assets, 404 on missing file
        .route_service("/", ServeFile::new(asset_dir.join("ui.html")))
        .route_service("/style.css", ServeFile::new(asset_dir.join("style.css")))
        .route_service("/main.js", ServeFile::new(asset_dir.join("main.js")))
        .route_service("/favicon.ico", ServeFile::new(asset_dir.join("favicon.ico")))
        // Outline routes
        .route(
            "/outline/",
            get(handlers::get_root).post(handlers::create_in_root),
        )
        .route(
            "/outline/*path",
            get(handlers::get_item)
                .post(handlers::create_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        // Change polling
        .route("/updates/", get(handlers::get_updates))
        // System routes
        .route("/health", get(handlers::health_check))
        // Apply middleware
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        // Add the store as shared state
        .with_state(store)
}

/// Start the HTTP server and run until a shutdown signal arrives
pub async fn start_server(
    addr: SocketAddr,
    store: Arc<OutlineStore>,
    asset_dir: &Path,
) -> Result<()> {
    let app = create_app(store, asset_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Outline available at http://{}/outline/", addr);
    info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::server(format!("HTTP server failed: {}", e)))?;

    Ok(())
}

/// Resolves when Ctrl+C or SIGTERM arrives
async fn shutdown_signal() {
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
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
