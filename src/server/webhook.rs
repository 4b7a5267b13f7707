//! Webhook endpoint handler.
//!
//! Accepts GitHub webhook deliveries, validates signatures, and hands
//! `issue_comment` events to the dispatcher on a background task before
//! returning 202 Accepted. The response never waits for command processing.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{Instrument, debug, info_span, warn};

use super::AppState;
use crate::effects::InterpreterFactory;
use crate::types::DeliveryId;
use crate::webhooks::{ParseError, SignatureError, parse_webhook, verify_signature};

/// Header name for GitHub event type.
const HEADER_EVENT: &str = "x-github-event";
/// Header name for GitHub delivery ID.
const HEADER_DELIVERY: &str = "x-github-delivery";
/// Header name for GitHub signature.
const HEADER_SIGNATURE: &str = "x-hub-signature-256";

/// Errors that can occur when receiving a webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Missing required header.
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),

    /// Signature absent, malformed, or wrong.
    #[error("invalid signature: {0}")]
    InvalidSignature(#[from] SignatureError),

    /// The body is not a usable `issue_comment` payload.
    #[error("invalid payload: {0}")]
    Parse(#[from] ParseError),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match &self {
            WebhookError::MissingHeader(_) => StatusCode::BAD_REQUEST,
            WebhookError::InvalidSignature(_) => StatusCode::UNAUTHORIZED,
            WebhookError::Parse(_) => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}

/// Webhook handler.
///
/// # Request
///
/// - Method: POST
/// - Headers:
///   - `X-Hub-Signature-256`: HMAC-SHA256 signature of the payload (required)
///   - `X-GitHub-Event`: Event type, e.g. "issue_comment" (required)
///   - `X-GitHub-Delivery`: Delivery ID, used only for logging
/// - Body: JSON webhook payload
///
/// # Response
///
/// - 202 Accepted: Delivery authenticated and accepted. Events the bot does
///   not act on are accepted too.
/// - 400 Bad Request: Missing event header or unparseable `issue_comment` body
/// - 401 Unauthorized: Missing or invalid signature
pub async fn webhook_handler<F>(
    State(app_state): State<AppState<F>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, &'static str), WebhookError>
where
    F: InterpreterFactory,
{
    let delivery_id = get_header(&headers, HEADER_DELIVERY)
        .map(DeliveryId::new)
        .unwrap_or_else(|_| DeliveryId::unknown());

    // Verify signature BEFORE any parsing.
    if let Err(e) = verify_signature(
        &body,
        headers.get(HEADER_SIGNATURE).and_then(|v| v.to_str().ok()),
        app_state.webhook_secret(),
    ) {
        warn!(delivery_id = %delivery_id, error = %e, "Rejected webhook");
        return Err(e.into());
    }

    let event_type = get_header(&headers, HEADER_EVENT)?;

    debug!(
        delivery_id = %delivery_id,
        event_type = %event_type,
        "Received webhook"
    );

    let event = match parse_webhook(&event_type, &body) {
        Ok(Some(event)) => event,
        Ok(None) => {
            debug!(delivery_id = %delivery_id, event_type = %event_type, "Ignoring event");
            return Ok((StatusCode::ACCEPTED, "Accepted"));
        }
        Err(e) => {
            warn!(delivery_id = %delivery_id, error = %e, "Unparseable payload");
            return Err(e.into());
        }
    };

    if !event.is_dispatchable() {
        debug!(
            delivery_id = %delivery_id,
            action = ?event.action,
            actor = %event.actor,
            "Ignoring comment"
        );
        return Ok((StatusCode::ACCEPTED, "Accepted"));
    }

    let span = info_span!(
        "dispatch",
        delivery_id = %delivery_id,
        repo = %event.repo,
        issue = %event.issue,
    );
    let state = app_state.clone();
    app_state.tracker().spawn(
        async move {
            state.dispatcher().run(delivery_id, event).await;
        }
        .instrument(span),
    );

    Ok((StatusCode::ACCEPTED, "Accepted"))
}

/// Extracts a header value as a string.
fn get_header(headers: &HeaderMap, name: &'static str) -> Result<String, WebhookError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or(WebhookError::MissingHeader(name))
}
