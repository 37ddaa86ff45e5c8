//! Intent — the typed surface between UI layers and the schedule.
//!
//! ARCHITECTURE
//! ============
//! The board, queue, and dialog UIs are external collaborators. Whatever
//! widget sits on top (drag handlers, context menus, modal forms) translates
//! its callbacks into one of these intents and hands it to `apply`, which
//! dispatches to the coordinator/admission services and returns a typed
//! `Applied` outcome. UI code never mutates the collections directly.
//!
//! ERROR HANDLING
//! ==============
//! Service errors implement `ErrorCode` so the UI layer gets a stable,
//! grepable `E_*` code alongside the human-readable message.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::services::admission::{self, AdmissionError, DialogOutcome, EventForm, TaskForm};
use crate::services::transfer::{self, TransferError};
use crate::state::{AppState, BoardEvent, Location, QueueItem};

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code and retryable flag for errors surfaced to the UI.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// INTENTS
// =============================================================================

/// A UI-originated request to change the schedule.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Drop a queued task onto the board.
    MoveToBoard {
        item_id: String,
        resource_id: String,
        #[serde(with = "time::serde::rfc3339")]
        start: OffsetDateTime,
    },
    /// Drag a scheduled event back off the board.
    MoveToQueue { item_id: String },
    /// Context-menu delete from either collection.
    Delete { location: Location, item_id: String },
    /// Add Task dialog result.
    AddTask { dialog: DialogOutcome<TaskForm> },
    /// Create Event dialog result from a time-range selection.
    CreateEvent { dialog: DialogOutcome<EventForm> },
}

/// What an applied intent did, returned to the issuing UI for re-render.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "applied", rename_all = "snake_case")]
pub enum Applied {
    Placed { event: BoardEvent },
    Queued { item: QueueItem },
    Deleted { removed: bool },
    TaskAdded { item: QueueItem },
    EventCreated { event: BoardEvent },
    /// Canceled dialog: nothing changed, not an error.
    Nothing,
}

#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error(transparent)]
    Admission(#[from] AdmissionError),
}

impl ErrorCode for IntentError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Transfer(e) => e.error_code(),
            Self::Admission(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Transfer(e) => e.retryable(),
            Self::Admission(e) => e.retryable(),
        }
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Apply one intent to the schedule.
///
/// # Errors
///
/// Propagates the coordinator/admission error; the schedule is unchanged on
/// failure.
pub async fn apply(state: &AppState, intent: Intent) -> Result<Applied, IntentError> {
    match intent {
        Intent::MoveToBoard { item_id, resource_id, start } => {
            let event = transfer::queue_to_board(state, &item_id, &resource_id, start).await?;
            Ok(Applied::Placed { event })
        }
        Intent::MoveToQueue { item_id } => {
            let item = transfer::board_to_queue(state, &item_id).await?;
            Ok(Applied::Queued { item })
        }
        Intent::Delete { location, item_id } => {
            let removed = transfer::delete(state, location, &item_id).await;
            Ok(Applied::Deleted { removed })
        }
        Intent::AddTask { dialog } => match admission::admit_task(state, dialog).await? {
            Some(item) => Ok(Applied::TaskAdded { item }),
            None => Ok(Applied::Nothing),
        },
        Intent::CreateEvent { dialog } => match admission::admit_event(state, dialog).await? {
            Some(event) => Ok(Applied::EventCreated { event }),
            None => Ok(Applied::Nothing),
        },
    }
}

#[cfg(test)]
#[path = "intent_test.rs"]
mod tests;
