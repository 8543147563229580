//! subsync - Stripe billing webhook receiver
//!
//! Subsync accepts billing webhook deliveries, verifies each one against the
//! endpoint's shared secret, and syncs a simplified subscription record
//! (`subscription_id`, `customer_id`, `active`) through a pluggable store.
//!
//! # Features
//!
//! - **Verification**: HMAC-SHA256 over the exact raw body, constant-time
//!   comparison, replay-window check
//! - **Dispatch**: a fixed allow-list of subscription lifecycle events; all
//!   other types are acknowledged without side effects
//! - **Storage**: the persistence seam is a trait; an in-memory store is
//!   included for development and testing
//! - **Testing**: oneshot HTTP testing utilities, no server required
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use subsync::{App, ConfigBuilder, InMemorySubscriptionStore, WebhookHandler};
//!
//! #[tokio::main]
//! async fn main() -> subsync::Result<()> {
//!     subsync::init_tracing();
//!
//!     let config = ConfigBuilder::new().from_env().build()?;
//!     let secret = config.webhook.secret.clone().expect("webhook secret");
//!
//!     let store = Arc::new(InMemorySubscriptionStore::new());
//!     let handler = WebhookHandler::new(store, secret)
//!         .with_tolerance_secs(config.webhook.tolerance_secs);
//!
//!     App::new(config, handler).serve().await
//! }
//! ```

mod config;
mod core;
mod error;
pub mod health;
pub mod storage;
pub mod testing;
pub mod utils;
pub mod webhook;

// Re-exports for public API
pub use config::{Config, ConfigBuilder, LoggingConfig, ServerConfig, WebhookConfig};
pub use core::App;
pub use error::{Result, SubsyncError};
pub use storage::{InMemorySubscriptionStore, SaveCall, SubscriptionRecord, SubscriptionStore};
pub use webhook::{EventKind, WebhookEvent, WebhookHandler, WebhookOutcome};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging with sensible defaults.
///
/// This should be called early, typically in main() before building the App.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Set log level (e.g., "info", "debug", "subsync=debug")
/// - `SUBSYNC_LOG_JSON`: Set to "true" for JSON formatted logs
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_logs = std::env::var("SUBSYNC_LOG_JSON")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialize tracing with a custom configuration.
pub fn init_tracing_with_config(config: &Config) {
    let env_filter = EnvFilter::new(&config.logging.level);

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
