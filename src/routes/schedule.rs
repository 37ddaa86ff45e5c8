//! Schedule routes — collection reads and intent application.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::warn;

use crate::intent::{self, Applied, ErrorCode, Intent, IntentError};
use crate::services::store::{self, StoreError};
use crate::services::transfer::TransferError;
use crate::state::{AppState, BoardEvent, QueueItem, Resource};

/// Visible window for the events query.
#[derive(Debug, Deserialize)]
pub struct EventWindow {
    #[serde(with = "time::serde::rfc3339")]
    pub from: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub to: OffsetDateTime,
}

/// `GET /api/resources` — all resources, grouped.
pub async fn list_resources(State(state): State<AppState>) -> Result<Json<Vec<Resource>>, StatusCode> {
    let resources = store::list_resources(&state).await.map_err(store_error_to_status)?;
    Ok(Json(resources))
}

/// `GET /api/events?from&to` — events overlapping the window.
pub async fn list_events(
    State(state): State<AppState>,
    Query(window): Query<EventWindow>,
) -> Result<Json<Vec<BoardEvent>>, StatusCode> {
    let events = store::list_events(&state, window.from, window.to)
        .await
        .map_err(store_error_to_status)?;
    Ok(Json(events))
}

/// `GET /api/queue` — current queue in insertion order.
pub async fn list_queue(State(state): State<AppState>) -> Result<Json<Vec<QueueItem>>, StatusCode> {
    let queue = store::list_queue(&state).await.map_err(store_error_to_status)?;
    Ok(Json(queue))
}

/// `POST /api/intents` — apply one UI intent.
pub async fn apply_intent(
    State(state): State<AppState>,
    Json(body): Json<Intent>,
) -> Result<Json<Applied>, StatusCode> {
    let applied = intent::apply(&state, body).await.map_err(|e| {
        warn!(code = e.error_code(), error = %e, "intent rejected");
        intent_error_to_status(&e)
    })?;
    Ok(Json(applied))
}

pub(crate) fn intent_error_to_status(err: &IntentError) -> StatusCode {
    match err {
        IntentError::Transfer(TransferError::NotFound { .. }) => StatusCode::NOT_FOUND,
        IntentError::Transfer(TransferError::InvalidResource(_)) | IntentError::Admission(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    }
}

pub(crate) fn store_error_to_status(err: StoreError) -> StatusCode {
    match err {
        StoreError::FetchFailed(_) => StatusCode::BAD_GATEWAY,
    }
}

#[cfg(test)]
#[path = "schedule_test.rs"]
mod tests;
