//! Shared application state and the scheduling-board data model.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the whole schedule (resources, board events, queue items) behind a
//! single `RwLock` so every coordinator operation is atomic with respect to
//! every other one: validate under the write lock, then mutate, or return
//! early leaving nothing half-moved.
//!
//! INVARIANT
//! =========
//! An item id lives in at most one of {queue, board}. Transfers are the only
//! operations that touch both collections, and they do so under one lock
//! acquisition.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;

// =============================================================================
// ERRORS
// =============================================================================

/// Construction-time validation failures for the model types.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid range: end {end} is not after start {start}")]
    InvalidRange { start: OffsetDateTime, end: OffsetDateTime },
    #[error("text must not be empty")]
    EmptyText,
    #[error("duration must be positive, got {0}")]
    InvalidDuration(Duration),
}

// =============================================================================
// RESOURCE
// =============================================================================

/// A schedulable lane on the board. One level of grouping via `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Whether the lane accepts new events. Display hint only; the core does
    /// not reject placements on unavailable lanes.
    #[serde(default = "default_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

impl Resource {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), parent_id: None, available: true }
    }

    /// Same resource, parented under a group lane.
    #[must_use]
    pub fn child_of(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

// =============================================================================
// BOARD EVENT
// =============================================================================

/// An item placed on a specific resource's timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardEvent {
    pub id: String,
    pub resource_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end: OffsetDateTime,
    pub text: String,
    /// Opaque display hint consumed by the board UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl BoardEvent {
    /// Build a validated event.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` if `end <= start` and `EmptyText` if the label
    /// is blank.
    pub fn new(
        id: impl Into<String>,
        resource_id: impl Into<String>,
        start: OffsetDateTime,
        end: OffsetDateTime,
        text: impl Into<String>,
        color: Option<String>,
    ) -> Result<Self, ModelError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ModelError::EmptyText);
        }
        if end <= start {
            return Err(ModelError::InvalidRange { start, end });
        }
        Ok(Self { id: id.into(), resource_id: resource_id.into(), start, end, text, color })
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

// =============================================================================
// QUEUE ITEM
// =============================================================================

/// Time claim of an unplaced task: either a bare duration, or the explicit
/// window it last occupied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueueSlot {
    Fixed {
        #[serde(with = "duration_seconds")]
        duration: Duration,
    },
    Window {
        #[serde(with = "time::serde::rfc3339")]
        start: OffsetDateTime,
        #[serde(with = "time::serde::rfc3339")]
        end: OffsetDateTime,
    },
}

/// An unplaced task waiting in the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub slot: QueueSlot,
}

impl QueueItem {
    /// Task with a fixed duration and no assigned slot.
    ///
    /// # Errors
    ///
    /// Returns `EmptyText` if the label is blank and `InvalidDuration` if the
    /// duration is not positive.
    pub fn fixed(id: impl Into<String>, text: impl Into<String>, duration: Duration) -> Result<Self, ModelError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ModelError::EmptyText);
        }
        if !duration.is_positive() {
            return Err(ModelError::InvalidDuration(duration));
        }
        Ok(Self { id: id.into(), text, slot: QueueSlot::Fixed { duration } })
    }

    /// Task carrying the explicit window it occupied before being queued.
    ///
    /// # Errors
    ///
    /// Returns `EmptyText` if the label is blank and `InvalidRange` if
    /// `end <= start`.
    pub fn window(
        id: impl Into<String>,
        text: impl Into<String>,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Self, ModelError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ModelError::EmptyText);
        }
        if end <= start {
            return Err(ModelError::InvalidRange { start, end });
        }
        Ok(Self { id: id.into(), text, slot: QueueSlot::Window { start, end } })
    }

    /// Elapsed time the task claims, regardless of slot shape.
    #[must_use]
    pub fn duration(&self) -> Duration {
        match self.slot {
            QueueSlot::Fixed { duration } => duration,
            QueueSlot::Window { start, end } => end - start,
        }
    }
}

/// Serialize `time::Duration` as whole seconds, matching the queue wire shape.
mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.whole_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        Ok(Duration::seconds(seconds))
    }
}

// =============================================================================
// COLLECTION TAG
// =============================================================================

/// Which collection an item lives in. Used by delete intents and by the
/// partition checks in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Queue,
    Board,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queue => f.write_str("queue"),
            Self::Board => f.write_str("board"),
        }
    }
}

// =============================================================================
// SCHEDULE STATE
// =============================================================================

/// The three collections, insertion order preserved.
#[derive(Debug, Default)]
pub struct ScheduleState {
    pub resources: Vec<Resource>,
    pub events: Vec<BoardEvent>,
    pub queue: Vec<QueueItem>,
}

impl ScheduleState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn resource_exists(&self, resource_id: &str) -> bool {
        self.resources.iter().any(|r| r.id == resource_id)
    }

    /// Where an item id currently lives, if anywhere. The partition invariant
    /// guarantees at most one answer; the board is checked first.
    #[must_use]
    pub fn location_of(&self, item_id: &str) -> Option<Location> {
        if self.events.iter().any(|e| e.id == item_id) {
            return Some(Location::Board);
        }
        if self.queue.iter().any(|q| q.id == item_id) {
            return Some(Location::Queue);
        }
        None
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum — the schedule is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub schedule: Arc<RwLock<ScheduleState>>,
    /// Simulated network latency applied by the read accessors.
    pub fetch_delay: std::time::Duration,
}

impl AppState {
    #[must_use]
    pub fn new(initial: ScheduleState, fetch_delay: std::time::Duration) -> Self {
        Self { schedule: Arc::new(RwLock::new(initial)), fetch_delay }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn event_rejects_inverted_range() {
        let start = datetime!(2018-05-05 00:00 UTC);
        let end = datetime!(2018-05-02 00:00 UTC);
        let result = BoardEvent::new("1", "R1", start, end, "Event", None);
        assert!(matches!(result, Err(ModelError::InvalidRange { .. })));
    }

    #[test]
    fn event_rejects_zero_length_range() {
        let at = datetime!(2018-05-02 00:00 UTC);
        let result = BoardEvent::new("1", "R1", at, at, "Event", None);
        assert!(matches!(result, Err(ModelError::InvalidRange { .. })));
    }

    #[test]
    fn event_rejects_blank_text() {
        let result = BoardEvent::new(
            "1",
            "R1",
            datetime!(2018-05-02 00:00 UTC),
            datetime!(2018-05-03 00:00 UTC),
            "   ",
            None,
        );
        assert!(matches!(result, Err(ModelError::EmptyText)));
    }

    #[test]
    fn fixed_item_serializes_duration_as_seconds() {
        let item = QueueItem::fixed("4", "Queue Event 1", Duration::hours(4)).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["duration"], serde_json::json!(14_400));
        assert!(json.get("start").is_none());
    }

    #[test]
    fn window_item_round_trips_through_json() {
        let item = QueueItem::window(
            "5",
            "Queue Event 2",
            datetime!(2023-01-01 00:00 UTC),
            datetime!(2023-01-01 04:00 UTC),
        )
        .unwrap();
        let json = serde_json::to_string(&item).unwrap();
        let restored: QueueItem = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, "5");
        assert_eq!(restored.duration(), Duration::hours(4));
        assert!(matches!(restored.slot, QueueSlot::Window { .. }));
    }

    #[test]
    fn queue_item_duration_covers_both_slot_shapes() {
        let fixed = QueueItem::fixed("4", "Task", Duration::hours(4)).unwrap();
        assert_eq!(fixed.duration(), Duration::hours(4));

        let window = QueueItem::window(
            "5",
            "Task",
            datetime!(2023-01-01 00:00 UTC),
            datetime!(2023-01-01 04:00 UTC),
        )
        .unwrap();
        assert_eq!(window.duration(), Duration::hours(4));
    }

    #[test]
    fn resource_deserializes_with_default_availability() {
        let resource: Resource = serde_json::from_str(r#"{"id":"R1","name":"Resource 1"}"#).unwrap();
        assert!(resource.available);
        assert!(resource.parent_id.is_none());
    }

    #[test]
    fn location_of_finds_items_in_either_collection() {
        let mut schedule = test_helpers::small_schedule();
        schedule.events.push(test_helpers::dummy_event("1", "R1"));

        assert_eq!(schedule.location_of("4"), Some(Location::Queue));
        assert_eq!(schedule.location_of("1"), Some(Location::Board));
        assert_eq!(schedule.location_of("nope"), None);
    }
}
