//! Billing webhook receiving.
//!
//! Provides signature verification, event typing, dispatch, and the HTTP
//! route for incoming Stripe billing webhooks.

pub mod event;
pub mod handler;
pub mod routes;
pub mod verification;

pub use event::{CheckoutCompleted, EventKind, SubscriptionChange, WebhookEvent, WebhookEventData};
pub use handler::{WebhookHandler, WebhookOutcome};
pub use routes::routes;
