//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Thin HTTP surface over the data store and the intent dispatcher: three
//! read endpoints matching the collections, one intent endpoint for
//! mutations, and a health check. CORS is wide open — this is a demo
//! backend for a browser scheduling widget.

pub mod schedule;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/resources", get(schedule::list_resources))
        .route("/api/events", get(schedule::list_events))
        .route("/api/queue", get(schedule::list_queue))
        .route("/api/intents", post(schedule::apply_intent))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
