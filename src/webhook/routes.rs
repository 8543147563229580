//! HTTP surface for the webhook receiver.
//!
//! The handler reads the body as raw [`Bytes`] so verification runs over the
//! exact bytes the provider signed; nothing upstream may parse or
//! re-serialize the body first.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;

use crate::error::{Result, SubsyncError};

use super::handler::{WebhookHandler, WebhookOutcome};

/// Build the webhook router mounted at `path`.
pub fn routes(handler: WebhookHandler, path: &str) -> Router {
    Router::new()
        .route(path, post(receive_webhook).fallback(method_not_allowed))
        .with_state(handler)
}

/// Receive a webhook delivery.
///
/// Verification failures propagate as errors (400, plain text). Failures
/// during dispatch or persistence are acknowledged with a 200 and an error
/// body: the status code alone does not distinguish success from a handling
/// failure, so the provider will not re-deliver on its own.
async fn receive_webhook(
    State(handler): State<WebhookHandler>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| SubsyncError::verification("missing stripe-signature header"))?;

    let event = handler.verify_signature(&body, signature)?;

    match handler.handle_event(&event).await {
        Ok(outcome) => {
            if outcome == WebhookOutcome::Ignored {
                tracing::debug!(event_type = %event.event_type, "event acknowledged without action");
            }
            Ok((StatusCode::OK, Json(json!({ "received": true }))).into_response())
        }
        Err(e) => {
            tracing::error!(
                event_id = %event.id,
                event_type = %event.event_type,
                error = %e,
                "webhook handling failed"
            );
            Ok((StatusCode::OK, Json(json!({ "error": "deu ruim" }))).into_response())
        }
    }
}

/// Reject non-POST methods on the webhook path.
async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        "Method not allowed",
    )
}
