//! Webhook event types.
//!
//! The envelope (`id`, `type`, `data.object`, `created`) is reconstructed
//! from the verified raw bytes on every request; nothing here has persistent
//! identity. Each relevant event type decodes into its own payload struct
//! carrying only the fields that type guarantees, so field access never
//! reaches into untyped JSON at dispatch time.

use serde::Deserialize;

use crate::error::{Result, SubsyncError};

/// Event types this receiver acts on.
///
/// Membership is the only "state" in the receiver: a pure function of the
/// event type string. Everything outside this list is acknowledged without
/// side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    CheckoutCompleted,
    SubscriptionCreated,
    SubscriptionUpdated,
    SubscriptionDeleted,
}

impl EventKind {
    /// Map a provider event type string onto the allow-list.
    ///
    /// Returns `None` for any type the receiver does not act on.
    #[must_use]
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "checkout.session.completed" => Some(Self::CheckoutCompleted),
            "customer.subscription.created" => Some(Self::SubscriptionCreated),
            "customer.subscription.updated" => Some(Self::SubscriptionUpdated),
            "customer.subscription.deleted" => Some(Self::SubscriptionDeleted),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckoutCompleted => "checkout.session.completed",
            Self::SubscriptionCreated => "customer.subscription.created",
            Self::SubscriptionUpdated => "customer.subscription.updated",
            Self::SubscriptionDeleted => "customer.subscription.deleted",
        }
    }
}

/// Parsed webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Event ID.
    pub id: String,
    /// Event type (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event data.
    pub data: WebhookEventData,
    /// Timestamp when the event was created.
    pub created: u64,
}

/// Webhook event data.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    /// The object that triggered the event.
    pub object: serde_json::Value,
}

/// Payload of a `checkout.session.completed` event.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutCompleted {
    /// Subscription created by the checkout.
    pub subscription: String,
    /// Customer the checkout belongs to.
    pub customer: String,
}

impl CheckoutCompleted {
    /// Decode from the event's `data.object`.
    pub fn from_object(object: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(object.clone()).map_err(|e| {
            SubsyncError::bad_request(format!("invalid checkout session payload: {}", e))
        })
    }
}

/// Payload of a `customer.subscription.*` event.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionChange {
    /// Subscription ID.
    pub id: String,
    /// Customer the subscription belongs to.
    pub customer: String,
}

impl SubscriptionChange {
    /// Decode from the event's `data.object`.
    pub fn from_object(object: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(object.clone()).map_err(|e| {
            SubsyncError::bad_request(format!("invalid subscription payload: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_kind_allow_list() {
        assert_eq!(
            EventKind::from_event_type("checkout.session.completed"),
            Some(EventKind::CheckoutCompleted)
        );
        assert_eq!(
            EventKind::from_event_type("customer.subscription.created"),
            Some(EventKind::SubscriptionCreated)
        );
        assert_eq!(
            EventKind::from_event_type("customer.subscription.updated"),
            Some(EventKind::SubscriptionUpdated)
        );
        assert_eq!(
            EventKind::from_event_type("customer.subscription.deleted"),
            Some(EventKind::SubscriptionDeleted)
        );
    }

    #[test]
    fn test_event_kind_rejects_other_types() {
        assert_eq!(EventKind::from_event_type("invoice.paid"), None);
        assert_eq!(EventKind::from_event_type("payment_intent.succeeded"), None);
        assert_eq!(EventKind::from_event_type(""), None);
    }

    #[test]
    fn test_event_kind_round_trips() {
        for kind in [
            EventKind::CheckoutCompleted,
            EventKind::SubscriptionCreated,
            EventKind::SubscriptionUpdated,
            EventKind::SubscriptionDeleted,
        ] {
            assert_eq!(EventKind::from_event_type(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_envelope_deserialization() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{"id":"evt_1","type":"invoice.paid","data":{"object":{"id":"in_1"}},"created":1700000000}"#,
        )
        .unwrap();

        assert_eq!(event.id, "evt_1");
        assert_eq!(event.event_type, "invoice.paid");
        assert_eq!(event.created, 1700000000);
        assert_eq!(event.data.object["id"], "in_1");
    }

    #[test]
    fn test_checkout_payload_decode() {
        let object = json!({
            "id": "cs_1",
            "subscription": "sub_1",
            "customer": "cus_1",
            "mode": "subscription"
        });

        let payload = CheckoutCompleted::from_object(&object).unwrap();
        assert_eq!(payload.subscription, "sub_1");
        assert_eq!(payload.customer, "cus_1");
    }

    #[test]
    fn test_checkout_payload_missing_subscription() {
        // One-time payment sessions have no subscription field.
        let object = json!({"id": "cs_1", "customer": "cus_1"});
        assert!(CheckoutCompleted::from_object(&object).is_err());
    }

    #[test]
    fn test_subscription_payload_decode() {
        let object = json!({
            "id": "sub_2",
            "customer": "cus_2",
            "status": "canceled"
        });

        let payload = SubscriptionChange::from_object(&object).unwrap();
        assert_eq!(payload.id, "sub_2");
        assert_eq!(payload.customer, "cus_2");
    }

    #[test]
    fn test_subscription_payload_missing_customer() {
        let object = json!({"id": "sub_2"});
        assert!(SubscriptionChange::from_object(&object).is_err());
    }
}
