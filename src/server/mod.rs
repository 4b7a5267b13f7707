//! HTTP server for the comment dispatch bot.
//!
//! This module implements the HTTP server that:
//! - Accepts webhooks from GitHub, validates signatures, and hands comment
//!   events to the dispatcher on background tasks
//! - Provides health checks for liveness probes
//!
//! # Endpoints
//!
//! - `POST /webhook` - Accepts GitHub webhook deliveries (returns 202 Accepted)
//! - `GET /health` - Returns 200 if server is running

use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::dispatch::Dispatcher;
use crate::effects::InterpreterFactory;

pub mod health;
pub mod webhook;

pub use health::health_handler;
pub use webhook::{WebhookError, webhook_handler};

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor. Every
/// background dispatch task is spawned on the tracker so shutdown can wait
/// for them.
pub struct AppState<F> {
    inner: Arc<AppStateInner<F>>,
}

struct AppStateInner<F> {
    /// Webhook secret for HMAC-SHA256 signature verification.
    webhook_secret: Vec<u8>,

    dispatcher: Dispatcher<F>,

    /// In-flight dispatch tasks.
    tracker: TaskTracker,
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: InterpreterFactory> AppState<F> {
    pub fn new(
        webhook_secret: impl Into<Vec<u8>>,
        dispatcher: Dispatcher<F>,
        tracker: TaskTracker,
    ) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                webhook_secret: webhook_secret.into(),
                dispatcher,
                tracker,
            }),
        }
    }

    /// Returns the webhook secret.
    pub fn webhook_secret(&self) -> &[u8] {
        &self.inner.webhook_secret
    }

    pub fn dispatcher(&self) -> &Dispatcher<F> {
        &self.inner.dispatcher
    }

    pub fn tracker(&self) -> &TaskTracker {
        &self.inner.tracker
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<F: InterpreterFactory>(app_state: AppState<F>) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/webhook", post(webhook_handler::<F>))
        .route("/health", get(health_handler))
        .with_state(app_state)
}
