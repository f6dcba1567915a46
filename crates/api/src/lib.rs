//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for resource metadata, downloads and folder listing
//! - Mapping from the application error taxonomy to HTTP responses

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use bucketfront_core::resource::ResourceService;
use bucketfront_core::storage::{ObjectStore, OpendalStore};

pub use error::ApiError;

/// Application state shared across handlers.
pub struct AppState<S: ObjectStore = OpendalStore> {
    /// Resource service bound to the configured bucket.
    pub resources: Arc<ResourceService<S>>,
}

impl<S: ObjectStore> AppState<S> {
    /// Create state around a resource service.
    #[must_use]
    pub fn new(resources: ResourceService<S>) -> Self {
        Self {
            resources: Arc::new(resources),
        }
    }
}

impl<S: ObjectStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            resources: Arc::clone(&self.resources),
        }
    }
}

/// Creates the main application router.
pub fn create_router<S: ObjectStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
