use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// The main error type for subsync.
#[derive(Debug, thiserror::Error)]
pub enum SubsyncError {
    /// The webhook signature did not match the raw body and shared secret.
    ///
    /// The display prefix is part of the wire contract: verification failures
    /// are answered with a plain-text 400 body of `Webhook error: <message>`.
    #[error("Webhook error: {0}")]
    Verification(String),

    /// An allow-listed event type reached dispatch without a matching case.
    #[error("Unhandled event: {0}")]
    UnhandledEvent(String),

    /// The subscription store rejected or failed the save call.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl SubsyncError {
    pub fn verification(msg: impl Into<String>) -> Self {
        Self::Verification(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Verification(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnhandledEvent(_)
            | Self::Persistence(_)
            | Self::Config(_)
            | Self::Internal(_)
            | Self::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to expose to clients.
    ///
    /// Client errors (4xx) carry their full message. Server errors hide
    /// details to prevent information disclosure; the full error is logged
    /// server-side.
    fn safe_message(&self) -> String {
        match self {
            Self::Verification(_) | Self::BadRequest(_) => self.to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

/// JSON error body for non-webhook error responses.
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for SubsyncError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        } else {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        }

        match self {
            // Plain-text body, matching the provider-facing contract.
            Self::Verification(_) => (status, self.to_string()).into_response(),
            _ => {
                let body = Json(ErrorResponse {
                    error: self.safe_message(),
                });
                (status, body).into_response()
            }
        }
    }
}

/// Result type alias used throughout subsync.
pub type Result<T> = std::result::Result<T, SubsyncError>;

impl From<serde_json::Error> for SubsyncError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            SubsyncError::BadRequest(format!("JSON error: {}", err))
        } else {
            SubsyncError::Internal(format!("JSON serialization error: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_error_display() {
        let err = SubsyncError::verification("No signatures found matching the expected signature");
        assert_eq!(
            err.to_string(),
            "Webhook error: No signatures found matching the expected signature"
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_request_error() {
        let err = SubsyncError::bad_request("Invalid input");
        assert!(matches!(err, SubsyncError::BadRequest(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unhandled_event_error() {
        let err = SubsyncError::UnhandledEvent("customer.subscription.created".to_string());
        assert_eq!(
            err.to_string(),
            "Unhandled event: customer.subscription.created"
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_persistence_error_status() {
        let err = SubsyncError::Persistence("store unavailable".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_safe_message_hides_server_details() {
        let err = SubsyncError::internal("connection to db-prod-01:5432 failed");
        assert_eq!(err.safe_message(), "Internal server error");

        let err = SubsyncError::Persistence("table subscriptions is locked".to_string());
        assert_eq!(err.safe_message(), "Internal server error");
    }

    #[test]
    fn test_safe_message_exposes_client_errors() {
        let err = SubsyncError::bad_request("missing field customer");
        assert_eq!(err.safe_message(), "Bad request: missing field customer");
    }

    #[test]
    fn test_from_serde_json_error() {
        let result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("{ not json }");
        let err: SubsyncError = result.unwrap_err().into();
        assert!(matches!(err, SubsyncError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_verification_error_into_response_is_plain_text() {
        let err = SubsyncError::verification("timestamp outside tolerance");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Webhook error: timestamp outside tolerance");
    }

    #[tokio::test]
    async fn test_internal_error_into_response_is_json() {
        let err = SubsyncError::internal("boom");
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
    }
}
