//! Web layer module
//!
//! HTTP interface for icon matching. Handlers are thin: they pull the user
//! input out of the request, hand it to [`IconMatcher`] and shape the reply.

use anyhow::Result;
use axum::{Router, extract::DefaultBodyLimit, routing::get};
use std::net::SocketAddr;
use std::time::Instant;
use tower_http::cors::CorsLayer;

use crate::{config::WebConfig, matching::IconMatcher};

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod responses;

pub use responses::{FailureResponse, MatchResponse};

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(config: &WebConfig, matcher: IconMatcher) -> Result<Self> {
        let state = AppState::new(matcher);
        let app = Self::create_router(state, config.max_request_size);
        let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

        Ok(Self { app, addr })
    }

    /// Create the router with all routes and middleware
    pub fn create_router(state: AppState, max_request_size: usize) -> Router {
        Router::new()
            .route("/health", get(handlers::health::health_check))
            .route(
                "/api/getFilteredIconsFromPNG",
                get(handlers::matching::png_icons).post(handlers::matching::png_icons),
            )
            .route(
                "/api/getFilteredIconsFromSVG",
                get(handlers::matching::svg_icons).post(handlers::matching::svg_icons),
            )
            // Middleware (applied in reverse order)
            .layer(DefaultBodyLimit::max(max_request_size))
            .layer(CorsLayer::permissive())
            .layer(axum::middleware::from_fn(
                middleware::request_logging_middleware,
            ))
            .with_state(state)
    }

    /// Start the web server, stopping gracefully on SIGINT/SIGTERM
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", self.addr, e))?;
        tracing::info!("Web server listening on http://{}", self.addr);

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }

    /// Get the bind address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down gracefully"),
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: IconMatcher,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(matcher: IconMatcher) -> Self {
        Self {
            matcher,
            started_at: Instant::now(),
        }
    }
}
