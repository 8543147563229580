use std::sync::Arc;

use subsync::{App, ConfigBuilder, InMemorySubscriptionStore, SubsyncError, WebhookHandler};

#[tokio::main]
async fn main() -> subsync::Result<()> {
    let config = ConfigBuilder::new().from_env().build()?;
    subsync::init_tracing_with_config(&config);

    let secret = config.webhook.secret.clone().ok_or_else(|| {
        SubsyncError::Config("SUBSYNC_STRIPE_WEBHOOK_SECRET must be set".to_string())
    })?;

    // Reference store; swap in a real SubscriptionStore implementation to
    // persist across restarts.
    let store = Arc::new(InMemorySubscriptionStore::new());

    let handler =
        WebhookHandler::new(store, secret).with_tolerance_secs(config.webhook.tolerance_secs);

    App::new(config, handler).serve().await
}
