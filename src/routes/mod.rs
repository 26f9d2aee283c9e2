// HTTP routes: the webhook event endpoint

mod webhook;

use axum::{Router, routing::post};
use std::sync::Arc;

use crate::sink::Sink;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) sink: Arc<dyn Sink>,
}

pub fn app(webhook_path: &str, sink: Arc<dyn Sink>) -> Router {
    let state = AppState { sink };
    Router::new()
        .route(webhook_path, post(webhook::event_handler)) // POST <configured path>
        .with_state(state)
}
