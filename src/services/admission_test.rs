use super::*;
use crate::state::test_helpers;
use time::macros::datetime;

fn submitted_task(text: &str, minutes: TaskDuration) -> DialogOutcome<TaskForm> {
    DialogOutcome::Submitted { form: TaskForm { text: text.into(), minutes } }
}

fn submitted_event(text: &str, resource_id: &str) -> DialogOutcome<EventForm> {
    DialogOutcome::Submitted {
        form: EventForm {
            text: text.into(),
            start: datetime!(2023-06-01 09:00 UTC),
            end: datetime!(2023-06-01 11:00 UTC),
            resource_id: resource_id.into(),
        },
    }
}

#[tokio::test]
async fn admit_task_appends_to_queue_with_fresh_id() {
    let state = test_helpers::test_app_state();

    let item = admit_task(&state, submitted_task("Task 1", TaskDuration::OneHour))
        .await
        .expect("admission should succeed")
        .expect("submitted dialog admits an item");

    assert_eq!(item.text, "Task 1");
    assert_eq!(item.duration(), time::Duration::minutes(60));
    assert!(!item.id.is_empty());

    let schedule = state.schedule.read().await;
    assert_eq!(schedule.queue.len(), 1);
    assert_eq!(schedule.queue[0].id, item.id);
}

#[tokio::test]
async fn admit_task_generates_distinct_ids() {
    let state = test_helpers::test_app_state();

    let a = admit_task(&state, submitted_task("Task 1", TaskDuration::OneHour))
        .await
        .unwrap()
        .unwrap();
    let b = admit_task(&state, submitted_task("Task 2", TaskDuration::FourHours))
        .await
        .unwrap()
        .unwrap();

    assert_ne!(a.id, b.id);
}

#[tokio::test]
async fn admit_task_rejects_blank_text() {
    let state = test_helpers::test_app_state();

    let result = admit_task(&state, submitted_task("   ", TaskDuration::OneHour)).await;
    assert!(matches!(result, Err(AdmissionError::Invalid(crate::state::ModelError::EmptyText))));

    let schedule = state.schedule.read().await;
    assert!(schedule.queue.is_empty());
}

#[tokio::test]
async fn canceled_task_dialog_admits_nothing() {
    let state = test_helpers::test_app_state();

    let admitted = admit_task(&state, DialogOutcome::Canceled)
        .await
        .expect("cancellation is not an error");
    assert!(admitted.is_none());

    let schedule = state.schedule.read().await;
    assert!(schedule.queue.is_empty());
}

#[tokio::test]
async fn admit_event_appends_to_board() {
    let state = test_helpers::test_app_state_with(test_helpers::small_schedule());

    let event = admit_event(&state, submitted_event("Event 1", "R1"))
        .await
        .expect("admission should succeed")
        .expect("submitted dialog admits an event");

    assert_eq!(event.resource_id, "R1");
    assert_eq!(event.duration(), time::Duration::hours(2));

    let schedule = state.schedule.read().await;
    assert_eq!(schedule.events.len(), 1);
}

#[tokio::test]
async fn admit_event_rejects_inverted_range_without_mutation() {
    let state = test_helpers::test_app_state_with(test_helpers::small_schedule());

    let dialog = DialogOutcome::Submitted {
        form: EventForm {
            text: "Event 1".into(),
            start: datetime!(2023-06-01 11:00 UTC),
            end: datetime!(2023-06-01 09:00 UTC),
            resource_id: "R1".into(),
        },
    };
    let result = admit_event(&state, dialog).await;
    assert!(matches!(
        result,
        Err(AdmissionError::Invalid(crate::state::ModelError::InvalidRange { .. }))
    ));

    let schedule = state.schedule.read().await;
    assert!(schedule.events.is_empty());
}

#[tokio::test]
async fn admit_event_rejects_unknown_resource() {
    let state = test_helpers::test_app_state_with(test_helpers::small_schedule());

    let result = admit_event(&state, submitted_event("Event 1", "R99")).await;
    assert!(matches!(result, Err(AdmissionError::InvalidResource(ref id)) if id == "R99"));

    let schedule = state.schedule.read().await;
    assert!(schedule.events.is_empty());
}

#[tokio::test]
async fn canceled_event_dialog_admits_nothing() {
    let state = test_helpers::test_app_state_with(test_helpers::small_schedule());

    let admitted = admit_event(&state, DialogOutcome::Canceled)
        .await
        .expect("cancellation is not an error");
    assert!(admitted.is_none());

    let schedule = state.schedule.read().await;
    assert!(schedule.events.is_empty());
}

#[test]
fn task_duration_accepts_only_the_enumerated_set() {
    for (minutes, expected) in [
        (60, TaskDuration::OneHour),
        (120, TaskDuration::TwoHours),
        (180, TaskDuration::ThreeHours),
        (240, TaskDuration::FourHours),
    ] {
        assert_eq!(TaskDuration::try_from(minutes).unwrap(), expected);
    }

    assert!(TaskDuration::try_from(90).is_err());
    assert!(TaskDuration::try_from(0).is_err());
    assert!(TaskDuration::try_from(-60).is_err());
}

#[test]
fn dialog_outcome_deserializes_both_shapes() {
    let canceled: DialogOutcome<TaskForm> = serde_json::from_str(r#"{"outcome":"canceled"}"#).unwrap();
    assert!(matches!(canceled, DialogOutcome::Canceled));

    let submitted: DialogOutcome<TaskForm> =
        serde_json::from_str(r#"{"outcome":"submitted","text":"Task 1","minutes":60}"#).unwrap();
    let DialogOutcome::Submitted { form } = submitted else {
        panic!("expected submitted form");
    };
    assert_eq!(form.text, "Task 1");
    assert_eq!(form.minutes, TaskDuration::OneHour);
}

#[test]
fn task_duration_rejects_unsupported_minutes_in_json() {
    let result: Result<TaskForm, _> = serde_json::from_str(r#"{"text":"Task 1","minutes":90}"#);
    assert!(result.is_err());
}
