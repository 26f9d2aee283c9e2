// Webhook event ingestion: JSON payloads dispatched on their action label

use axum::{extract::State, http::StatusCode};
use bytes::Bytes;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::AppState;
use crate::models::FieldValue;

/// Supported event payloads, discriminated by the `action` field. Decoding
/// is two-phase: serde reads the tag first, then fills the matching variant.
#[derive(Debug, Deserialize)]
#[serde(tag = "action")]
pub(super) enum WebhookEvent {
    #[serde(rename = "fp.dialog")]
    DialogOpened { id: String },
    #[serde(rename = "fp.upload")]
    Uploaded { id: String },
}

impl WebhookEvent {
    fn action(&self) -> &'static str {
        match self {
            WebhookEvent::DialogOpened { .. } => "fp.dialog",
            WebhookEvent::Uploaded { .. } => "fp.upload",
        }
    }

    fn id(&self) -> &str {
        match self {
            WebhookEvent::DialogOpened { id } | WebhookEvent::Uploaded { id } => id,
        }
    }
}

/// POST <webhook.path> — 200 with an empty body and exactly one emitted
/// record for a supported event, plain 400 otherwise. An unsupported event
/// type and an unparseable body are indistinguishable to the caller; the
/// difference is only logged.
pub(super) async fn event_handler(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(ev) => ev,
        Err(e) => {
            tracing::debug!(error = %e, "webhook payload rejected");
            return StatusCode::BAD_REQUEST;
        }
    };

    let tags = BTreeMap::from([("action".to_string(), event.action().to_string())]);
    let fields = BTreeMap::from([("id".to_string(), FieldValue::from(event.id()))]);
    state.sink.add_gauge("webhooks", fields, tags);
    StatusCode::OK
}
