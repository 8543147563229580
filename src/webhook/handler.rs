//! Webhook event handling.
//!
//! Verifies incoming payloads and routes relevant events to the subscription
//! store. The handler is stateless per request; it issues at most one
//! persistence call per event and performs no deduplication of replayed
//! deliveries (that belongs to the store).

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::error::{Result, SubsyncError};
use crate::storage::SubscriptionStore;

use super::event::{CheckoutCompleted, EventKind, SubscriptionChange, WebhookEvent};
use super::verification;

/// Outcome of webhook processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Event was relevant and the subscription record was saved.
    Processed,
    /// Event type is outside the allow-list; acknowledged without side effects.
    Ignored,
}

/// Webhook handler for billing events.
///
/// The webhook secret is stored using [`SecretString`] to prevent accidental
/// exposure in logs or debug output.
#[derive(Clone)]
pub struct WebhookHandler {
    store: Arc<dyn SubscriptionStore>,
    webhook_secret: SecretString,
    tolerance_secs: i64,
}

impl WebhookHandler {
    /// Create a new webhook handler with the default 5-minute signature
    /// timestamp tolerance.
    #[must_use]
    pub fn new(store: Arc<dyn SubscriptionStore>, webhook_secret: impl Into<SecretString>) -> Self {
        Self {
            store,
            webhook_secret: webhook_secret.into(),
            tolerance_secs: 300,
        }
    }

    /// Override the signature timestamp tolerance.
    #[must_use]
    pub fn with_tolerance_secs(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Verify the webhook signature and parse the event.
    ///
    /// # Arguments
    /// * `payload` - The exact raw request body bytes
    /// * `signature` - The `stripe-signature` header value
    ///
    /// # Errors
    /// Returns [`SubsyncError::Verification`] if the signature does not
    /// match or the payload is not a valid event envelope.
    pub fn verify_signature(&self, payload: &[u8], signature: &str) -> Result<WebhookEvent> {
        verification::verify_signature(
            payload,
            signature,
            self.webhook_secret.expose_secret(),
            self.tolerance_secs,
        )?;

        // Only parse after the MAC checks out.
        let event: WebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            tracing::warn!(error = %e, "failed to parse webhook payload");
            SubsyncError::verification("malformed event payload")
        })?;

        Ok(event)
    }

    /// Process a verified webhook event.
    ///
    /// Irrelevant event types return [`WebhookOutcome::Ignored`]. Relevant
    /// types compute the three-field subscription record and hand it to the
    /// store exactly once.
    pub async fn handle_event(&self, event: &WebhookEvent) -> Result<WebhookOutcome> {
        let Some(kind) = EventKind::from_event_type(&event.event_type) else {
            tracing::debug!(
                event_id = %event.id,
                event_type = %event.event_type,
                "ignoring irrelevant event"
            );
            return Ok(WebhookOutcome::Ignored);
        };

        match kind {
            EventKind::SubscriptionUpdated | EventKind::SubscriptionDeleted => {
                let change = SubscriptionChange::from_object(&event.data.object)?;
                self.store
                    .save_subscription(&change.id, &change.customer, false)
                    .await?;
            }
            EventKind::CheckoutCompleted => {
                let checkout = CheckoutCompleted::from_object(&event.data.object)?;
                self.store
                    .save_subscription(&checkout.subscription, &checkout.customer, true)
                    .await?;
            }
            // customer.subscription.created is allow-listed but has no
            // dispatch case; it surfaces as a handling failure.
            EventKind::SubscriptionCreated => {
                return Err(SubsyncError::UnhandledEvent(event.event_type.clone()));
            }
        }

        tracing::info!(
            event_id = %event.id,
            event_type = %event.event_type,
            "webhook processed"
        );

        Ok(WebhookOutcome::Processed)
    }
}
