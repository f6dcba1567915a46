//! API route definitions.

use axum::Router;

use bucketfront_core::storage::ObjectStore;

use crate::AppState;

pub mod health;
pub mod resources;

/// Creates the API router with all routes.
pub fn api_routes<S: ObjectStore + 'static>() -> Router<AppState<S>> {
    Router::new()
        .merge(health::routes())
        .merge(resources::routes())
}
