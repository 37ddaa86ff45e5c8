//! Data store — asynchronous read accessors over the in-memory schedule.
//!
//! DESIGN
//! ======
//! Reads model a future network fetch even though the data is in memory: each
//! accessor sleeps for the configured fetch delay before taking the read
//! lock, then completes exactly once. Callers therefore never block on the
//! UI thread and the accessors swap cleanly for real HTTP calls later.
//!
//! ERROR HANDLING
//! ==============
//! The in-memory store cannot fail, but every accessor returns `Result` so a
//! backend-backed implementation can surface `FetchFailed` without changing
//! call sites.

use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::intent::ErrorCode;
use crate::state::{AppState, BoardEvent, QueueItem, Resource, ScheduleState};
use time::macros::{datetime, time};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Read against a real backend failed. Never produced by the in-memory
    /// store.
    #[error("fetch failed: {0}")]
    FetchFailed(String),
}

impl ErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FetchFailed(_) => "E_FETCH_FAILED",
        }
    }

    fn retryable(&self) -> bool {
        true
    }
}

// =============================================================================
// READ ACCESSORS
// =============================================================================

/// All resources, grouped so each parent is immediately followed by its
/// children, insertion order otherwise preserved.
///
/// # Errors
///
/// Returns `FetchFailed` only when backed by a real data source.
pub async fn list_resources(state: &AppState) -> Result<Vec<Resource>, StoreError> {
    simulate_fetch(state).await;
    let schedule = state.schedule.read().await;
    let resources = grouped(&schedule.resources);
    debug!(count = resources.len(), "listed resources");
    Ok(resources)
}

/// Events overlapping the `[from, to)` window.
///
/// # Errors
///
/// Returns `FetchFailed` only when backed by a real data source.
pub async fn list_events(
    state: &AppState,
    from: OffsetDateTime,
    to: OffsetDateTime,
) -> Result<Vec<BoardEvent>, StoreError> {
    simulate_fetch(state).await;
    let schedule = state.schedule.read().await;
    let events: Vec<BoardEvent> = schedule
        .events
        .iter()
        .filter(|e| e.start < to && e.end > from)
        .cloned()
        .collect();
    debug!(count = events.len(), %from, %to, "listed events in window");
    Ok(events)
}

/// Current queue, insertion order preserved.
///
/// # Errors
///
/// Returns `FetchFailed` only when backed by a real data source.
pub async fn list_queue(state: &AppState) -> Result<Vec<QueueItem>, StoreError> {
    simulate_fetch(state).await;
    let schedule = state.schedule.read().await;
    Ok(schedule.queue.clone())
}

async fn simulate_fetch(state: &AppState) {
    if !state.fetch_delay.is_zero() {
        tokio::time::sleep(state.fetch_delay).await;
    }
}

/// Parents in insertion order, each immediately followed by its children in
/// insertion order. Children whose parent is absent keep their relative order
/// at the end.
pub(crate) fn grouped(resources: &[Resource]) -> Vec<Resource> {
    let mut out = Vec::with_capacity(resources.len());
    for parent in resources.iter().filter(|r| r.parent_id.is_none()) {
        out.push(parent.clone());
        out.extend(
            resources
                .iter()
                .filter(|r| r.parent_id.as_deref() == Some(parent.id.as_str()))
                .cloned(),
        );
    }
    for orphan in resources {
        if !out.iter().any(|r| r.id == orphan.id) {
            out.push(orphan.clone());
        }
    }
    out
}

// =============================================================================
// DEMO SEED
// =============================================================================

/// The demo schedule served at startup: two resource groups, three placed
/// events, and two queued tasks (one duration-only, one with an explicit
/// window).
#[must_use]
pub fn seed_demo_state() -> ScheduleState {
    let today = OffsetDateTime::now_utc();
    let mut schedule = ScheduleState::new();

    schedule.resources = vec![
        Resource::new("GA", "Group A"),
        Resource::new("R1", "Resource 1").child_of("GA"),
        Resource::new("R2", "Resource 2").child_of("GA"),
        Resource::new("GB", "Group B"),
        Resource::new("R3", "Resource 3").child_of("GB").unavailable(),
        Resource::new("R4", "Resource 4").child_of("GB"),
    ];

    schedule.events = vec![
        BoardEvent::new(
            "1",
            "R1",
            today.replace_time(time!(9:00)),
            today.replace_time(time!(11:00)),
            "Scheduler Event 1",
            Some("#e69138".into()),
        )
        .expect("demo seed is valid"),
        BoardEvent::new(
            "2",
            "R2",
            datetime!(2018-05-02 00:00 UTC),
            datetime!(2018-05-05 00:00 UTC),
            "Scheduler Event 2",
            Some("#6aa84f".into()),
        )
        .expect("demo seed is valid"),
        BoardEvent::new(
            "3",
            "R2",
            datetime!(2018-05-06 00:00 UTC),
            datetime!(2018-05-09 00:00 UTC),
            "Scheduler Event 3",
            Some("#3c78d8".into()),
        )
        .expect("demo seed is valid"),
    ];

    schedule.queue = vec![
        QueueItem::fixed("4", "Queue Event 1", Duration::hours(4)).expect("demo seed is valid"),
        QueueItem::window(
            "5",
            "Queue Event 2",
            datetime!(2023-01-01 00:00 UTC),
            datetime!(2023-01-01 04:00 UTC),
        )
        .expect("demo seed is valid"),
    ];

    schedule
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
