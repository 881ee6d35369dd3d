//! Axum-based HTTP server for the frame mirror.
//!
//! Provides endpoints for:
//! - GET `/` - Monitoring page (serves index.html)
//! - GET `/buffer` - Current mirror bytes as a JSON array
//! - GET `/api/geometry` - Panel width, height and page count

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use log::{error, info};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

use crate::config::WebConfig;
use crate::frame::FrameMirror;

use super::api::{ErrorResponse, GeometryResponse};

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /buffer - Returns the mirrored frame
///
/// The bytes are copied out under the mirror lock, so a response is always
/// one complete frame.
async fn get_buffer(State(mirror): State<Arc<FrameMirror>>) -> Json<Vec<u8>> {
    Json(mirror.snapshot())
}

/// GET /api/geometry - Returns the panel geometry
async fn get_geometry(State(mirror): State<Arc<FrameMirror>>) -> Json<GeometryResponse> {
    Json(GeometryResponse::from(mirror.as_ref()))
}

/// GET / - Serve the monitoring page
async fn index() -> impl IntoResponse {
    Html(include_str!("../../www/index.html"))
}

/// Fallback handler for 404
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}

// ============================================================================
// Server Builder
// ============================================================================

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebServerConfig {
    /// Address to bind to
    pub addr: SocketAddr,
    /// Whether to enable CORS for all origins
    pub cors_permissive: bool,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8088)),
            cors_permissive: true,
        }
    }
}

impl WebServerConfig {
    /// Create a new config with the given address
    pub fn new(addr: impl Into<SocketAddr>) -> Self {
        Self {
            addr: addr.into(),
            ..Default::default()
        }
    }

    /// Set whether CORS should be permissive
    pub fn cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }

    /// Create from shared WebConfig
    pub fn from_config(config: &WebConfig) -> Self {
        Self {
            addr: ([0, 0, 0, 0], config.port).into(),
            cors_permissive: config.cors_permissive,
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router(mirror: Arc<FrameMirror>, config: &WebServerConfig) -> Router {
    let mut router = Router::new()
        .route("/buffer", get(get_buffer))
        .route("/api/geometry", get(get_geometry))
        // Monitoring page
        .route("/", get(index))
        // Fallback
        .fallback(not_found)
        .with_state(mirror);

    // Add CORS if requested
    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Bind the server socket
///
/// Binding separately from [`serve`] lets a caller treat an occupied port as
/// a startup error before anything else is running.
pub async fn bind_server(config: &WebServerConfig) -> Result<TcpListener, std::io::Error> {
    TcpListener::bind(config.addr).await
}

/// Serve the mirror on an already bound listener
///
/// This function runs until the server fails.
pub async fn serve(
    listener: TcpListener,
    mirror: Arc<FrameMirror>,
    config: &WebServerConfig,
) -> Result<(), std::io::Error> {
    let router = build_router(mirror, config);
    info!("web server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await
}

/// Start the web server
///
/// This function runs until the server fails. A bind failure is returned
/// immediately.
pub async fn run_server(
    mirror: Arc<FrameMirror>,
    config: WebServerConfig,
) -> Result<(), std::io::Error> {
    let listener = bind_server(&config).await?;
    serve(listener, mirror, &config).await
}

/// Run the web server as a background task on the current runtime
///
/// The task ends when the server stops; the reason is logged. Must be called
/// from within a tokio runtime.
pub fn spawn_server(mirror: Arc<FrameMirror>, config: WebServerConfig) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = run_server(mirror, config).await {
            error!("web server stopped: {}", e);
        }
    })
}
