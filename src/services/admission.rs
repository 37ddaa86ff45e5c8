//! New-item admission — validates dialog-proposed tasks and events.
//!
//! DESIGN
//! ======
//! The external Dialog UI returns either a typed form or a cancellation
//! signal (`DialogOutcome`). Cancellation admits nothing and is not an
//! error. Submitted forms are validated through the model constructors, get
//! a fresh UUID id, and are appended to the owning collection.

use serde::Deserialize;
use time::{Duration, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::intent::ErrorCode;
use crate::state::{AppState, BoardEvent, ModelError, QueueItem};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("unknown resource: {0}")]
    InvalidResource(String),
    #[error(transparent)]
    Invalid(#[from] ModelError),
}

impl ErrorCode for AdmissionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidResource(_) => "E_INVALID_RESOURCE",
            Self::Invalid(ModelError::InvalidRange { .. } | ModelError::InvalidDuration(_)) => "E_INVALID_RANGE",
            Self::Invalid(ModelError::EmptyText) => "E_EMPTY_TEXT",
        }
    }
}

/// What the external Dialog UI reported back.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum DialogOutcome<T> {
    Submitted {
        #[serde(flatten)]
        form: T,
    },
    Canceled,
}

/// The enumerated duration choices offered by the Add Task dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum TaskDuration {
    OneHour,
    TwoHours,
    ThreeHours,
    FourHours,
}

impl TaskDuration {
    pub const CHOICES: [Self; 4] = [Self::OneHour, Self::TwoHours, Self::ThreeHours, Self::FourHours];

    #[must_use]
    pub fn minutes(self) -> i64 {
        match self {
            Self::OneHour => 60,
            Self::TwoHours => 120,
            Self::ThreeHours => 180,
            Self::FourHours => 240,
        }
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::minutes(self.minutes())
    }
}

impl TryFrom<i64> for TaskDuration {
    type Error = String;

    fn try_from(minutes: i64) -> Result<Self, Self::Error> {
        Self::CHOICES
            .into_iter()
            .find(|choice| choice.minutes() == minutes)
            .ok_or_else(|| format!("unsupported task duration: {minutes} minutes"))
    }
}

impl From<TaskDuration> for i64 {
    fn from(duration: TaskDuration) -> Self {
        duration.minutes()
    }
}

/// Add Task form: a label plus one of the enumerated durations.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskForm {
    pub text: String,
    pub minutes: TaskDuration,
}

/// Create Event form produced by a time-range selection on the board.
#[derive(Debug, Clone, Deserialize)]
pub struct EventForm {
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
    pub resource_id: String,
}

// =============================================================================
// ADMISSION
// =============================================================================

/// Admit a new task to the queue. Returns `None` on dialog cancellation.
///
/// # Errors
///
/// Returns `EmptyText` if the label is blank.
pub async fn admit_task(
    state: &AppState,
    dialog: DialogOutcome<TaskForm>,
) -> Result<Option<QueueItem>, AdmissionError> {
    let DialogOutcome::Submitted { form } = dialog else {
        info!("add-task dialog canceled");
        return Ok(None);
    };

    let item = QueueItem::fixed(Uuid::new_v4().to_string(), form.text.trim(), form.minutes.as_duration())?;

    let mut schedule = state.schedule.write().await;
    schedule.queue.push(item.clone());
    info!(item_id = %item.id, minutes = form.minutes.minutes(), "task admitted to queue");
    Ok(Some(item))
}

/// Admit a new event directly onto the board. Returns `None` on dialog
/// cancellation.
///
/// # Errors
///
/// Returns `InvalidRange` if `end <= start`, `EmptyText` if the label is
/// blank, and `InvalidResource` if the target lane does not exist. On error
/// the board is unchanged.
pub async fn admit_event(
    state: &AppState,
    dialog: DialogOutcome<EventForm>,
) -> Result<Option<BoardEvent>, AdmissionError> {
    let DialogOutcome::Submitted { form } = dialog else {
        info!("create-event dialog canceled");
        return Ok(None);
    };

    let event = BoardEvent::new(
        Uuid::new_v4().to_string(),
        form.resource_id.clone(),
        form.start,
        form.end,
        form.text.trim(),
        None,
    )?;

    let mut schedule = state.schedule.write().await;
    if !schedule.resource_exists(&form.resource_id) {
        return Err(AdmissionError::InvalidResource(form.resource_id));
    }
    schedule.events.push(event.clone());
    info!(item_id = %event.id, resource_id = %event.resource_id, "event admitted to board");
    Ok(Some(event))
}

#[cfg(test)]
#[path = "admission_test.rs"]
mod tests;
