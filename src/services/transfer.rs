//! Transfer coordinator — moves items between queue and board.
//!
//! DESIGN
//! ======
//! Each operation takes the write lock once, validates everything, and only
//! then mutates. A failed transfer leaves both collections untouched, so the
//! at-most-one-location invariant can never be observed violated.
//!
//! Queue items and board events are validated at construction, which is what
//! lets the transfer paths rebuild the counterpart entity by field without
//! re-running the range checks.

use time::OffsetDateTime;
use tracing::info;

use crate::intent::ErrorCode;
use crate::state::{AppState, BoardEvent, Location, QueueItem, QueueSlot};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("{location} item not found: {item_id}")]
    NotFound { location: Location, item_id: String },
    #[error("unknown resource: {0}")]
    InvalidResource(String),
}

impl ErrorCode for TransferError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "E_NOT_FOUND",
            Self::InvalidResource(_) => "E_INVALID_RESOURCE",
        }
    }
}

// =============================================================================
// QUEUE -> BOARD
// =============================================================================

/// Drop a queued task onto the board. The event keeps the item's id and
/// text; its end is `start + duration` (a stored window is translated onto
/// the new start).
///
/// # Errors
///
/// Returns `NotFound` if the id is not in the queue and `InvalidResource` if
/// the target resource does not exist. On error nothing is mutated.
pub async fn queue_to_board(
    state: &AppState,
    item_id: &str,
    resource_id: &str,
    start: OffsetDateTime,
) -> Result<BoardEvent, TransferError> {
    let mut schedule = state.schedule.write().await;

    let index = schedule
        .queue
        .iter()
        .position(|q| q.id == item_id)
        .ok_or_else(|| TransferError::NotFound { location: Location::Queue, item_id: item_id.to_owned() })?;
    if !schedule.resource_exists(resource_id) {
        return Err(TransferError::InvalidResource(resource_id.to_owned()));
    }

    let item = schedule.queue.remove(index);
    let duration = item.duration();
    let event = BoardEvent {
        id: item.id,
        resource_id: resource_id.to_owned(),
        start,
        end: start + duration,
        text: item.text,
        color: None,
    };
    schedule.events.push(event.clone());

    info!(item_id = %event.id, %resource_id, %start, "task placed on board");
    Ok(event)
}

// =============================================================================
// BOARD -> QUEUE
// =============================================================================

/// Drag a scheduled event back off the board. The queued task keeps the
/// event's id and text and claims `duration = end - start`.
///
/// # Errors
///
/// Returns `NotFound` if the id is not on the board. On error nothing is
/// mutated.
pub async fn board_to_queue(state: &AppState, item_id: &str) -> Result<QueueItem, TransferError> {
    let mut schedule = state.schedule.write().await;

    let index = schedule
        .events
        .iter()
        .position(|e| e.id == item_id)
        .ok_or_else(|| TransferError::NotFound { location: Location::Board, item_id: item_id.to_owned() })?;

    let event = schedule.events.remove(index);
    let item = QueueItem {
        id: event.id,
        text: event.text,
        slot: QueueSlot::Fixed { duration: event.end - event.start },
    };
    schedule.queue.push(item.clone());

    info!(item_id = %item.id, "event returned to queue");
    Ok(item)
}

// =============================================================================
// DELETE
// =============================================================================

/// Remove an item from the tagged collection. Deleting an absent id is an
/// idempotent no-op, matching the context-menu delete behavior. Returns
/// whether anything was removed.
pub async fn delete(state: &AppState, location: Location, item_id: &str) -> bool {
    let mut schedule = state.schedule.write().await;

    let removed = match location {
        Location::Queue => {
            let before = schedule.queue.len();
            schedule.queue.retain(|q| q.id != item_id);
            schedule.queue.len() < before
        }
        Location::Board => {
            let before = schedule.events.len();
            schedule.events.retain(|e| e.id != item_id);
            schedule.events.len() < before
        }
    };

    if removed {
        info!(%item_id, %location, "item deleted");
    }
    removed
}

#[cfg(test)]
#[path = "transfer_test.rs"]
mod tests;
