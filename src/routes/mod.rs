pub mod docs;
pub mod health;
pub mod search;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{middleware, AppState};

/// The full HTTP surface: health, search and the OpenAPI document.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health))
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .route("/api/search-jobs", post(search::search_jobs))
        .with_state(state)
        .layer(middleware::cors::permissive_cors())
        .layer(TraceLayer::new_for_http())
}
