//! Health check endpoint.

use axum::{Router, routing::get};

use bucketfront_core::storage::ObjectStore;

use crate::AppState;

/// Health check handler.
async fn ping() -> &'static str {
    "pong"
}

/// Creates health check routes.
pub fn routes<S: ObjectStore + 'static>() -> Router<AppState<S>> {
    Router::new().route("/health", get(ping))
}
