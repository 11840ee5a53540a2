//! Route definitions for the Shiftwise HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`. The
//! router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(store_routes())
        .merge(task_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Store creation (synchronous and async variants) and lookup.
fn store_routes() -> Router<AppState> {
    Router::new()
        .route("/stores", post(handlers::store::create_store))
        .route("/stores/async", post(handlers::store::create_store_async))
        .route("/stores/{id}", get(handlers::store::get_store))
}

/// Task polling endpoints.
fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks/{id}", get(handlers::task::get_task))
        .route("/tasks/{id}/result", get(handlers::task::get_task_result))
}

/// Liveness probe.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
