use axum::{Router, extract::DefaultBodyLimit};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{Result, SubsyncError};
use crate::health;
use crate::webhook::{self, WebhookHandler};

/// Main application structure for subsync.
///
/// Assembles the webhook and health routes, applies the middleware stack,
/// and serves with graceful shutdown.
pub struct App {
    router: Router,
    config: Config,
}

impl App {
    /// Create an app from configuration and a webhook handler.
    pub fn new(config: Config, handler: WebhookHandler) -> Self {
        let router = webhook::routes(handler, &config.webhook.path)
            .merge(health::routes())
            // Body size limit - reject oversized payloads before buffering
            .layer(DefaultBodyLimit::max(config.server.max_body_size))
            .layer(TraceLayer::new_for_http());

        Self { router, config }
    }

    /// Extract the router for testing purposes.
    ///
    /// The returned router can be driven with the [`crate::testing`] helpers
    /// without binding a socket.
    pub fn into_test_router(self) -> Router {
        self.router
    }

    /// Bind the configured address and serve until a shutdown signal arrives.
    pub async fn serve(self) -> Result<()> {
        let addr = self
            .config
            .server
            .addr()
            .map_err(|e| SubsyncError::Config(format!("Invalid server address: {}", e)))?;

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| SubsyncError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        tracing::info!(%addr, path = %self.config.webhook.path, "subsync listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| SubsyncError::internal(format!("Server error: {}", e)))
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
