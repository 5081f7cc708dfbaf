// Unit tests for Campus Match

use campus_match::config::{GestureSettings, Settings};
use campus_match::core::gesture::{feedback, transition, GestureEvent, GestureOutput, GestureState};
use campus_match::core::{MatchDetector, ProfileQueue};
use campus_match::models::{AcceptOutcome, Decision, Direction, Profile, ProfileId};
use chrono::{Duration, Utc};
use uuid::Uuid;

fn profiles(ids: &[i64]) -> Vec<Profile> {
    ids.iter().map(|id| Profile::new(*id, format!("User {}", id))).collect()
}

#[test]
fn test_queue_abc_reject_a() {
    let mut queue = ProfileQueue::new();
    queue.append(profiles(&[1, 2, 3]));
    queue.promote_if_needed();

    queue.remove(ProfileId(1));

    assert_eq!(queue.current().map(|p| p.id), Some(ProfileId(2)));
    assert_eq!(queue.buffer_ids(), vec![ProfileId(3)]);
}

#[test]
fn test_queue_remove_twice_is_idempotent() {
    let mut queue = ProfileQueue::new();
    queue.append(profiles(&[1, 2, 3]));
    queue.promote_if_needed();
    queue.remove(ProfileId(2));
    let before = (queue.current().map(|p| p.id), queue.buffer_ids());

    queue.remove(ProfileId(2));

    assert_eq!((queue.current().map(|p| p.id), queue.buffer_ids()), before);
}

#[test]
fn test_queue_never_duplicates_over_many_appends() {
    let mut queue = ProfileQueue::new();
    for round in 0..20i64 {
        let batch: Vec<i64> = (round..round + 5).chain([0, round]).collect();
        queue.append(profiles(&batch));
        queue.promote_if_needed();
    }

    let mut ids: Vec<ProfileId> = queue.current().map(|p| p.id).into_iter().collect();
    ids.extend(queue.buffer_ids());
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert_eq!(total, 24);
}

#[test]
fn test_transition_table() {
    let settings = GestureSettings::default();

    let (state, out) = transition(GestureState::Idle, GestureEvent::DragMove(40.0), &settings);
    assert_eq!((state, out), (GestureState::Idle, None));

    let (state, out) = transition(GestureState::Idle, GestureEvent::DragStart, &settings);
    assert_eq!((state, out), (GestureState::Dragging { delta_x: 0.0 }, None));

    let (state, _) = transition(state, GestureEvent::DragMove(-30.0), &settings);
    assert_eq!(state, GestureState::Dragging { delta_x: -30.0 });

    let (state, out) = transition(state, GestureEvent::DragEnd(-100.5), &settings);
    assert_eq!(state, GestureState::Resolved(Direction::Reject));
    assert_eq!(out, Some(GestureOutput::Decision(Decision::swipe(Direction::Reject))));

    let (state, out) = transition(state, GestureEvent::DragEnd(-300.0), &settings);
    assert_eq!((state, out), (GestureState::Resolved(Direction::Reject), None));
}

#[test]
fn test_custom_threshold_from_settings() {
    let mut settings = Settings::default();
    settings.gesture.threshold = 40.0;

    let (_, out) = transition(
        GestureState::Dragging { delta_x: 0.0 },
        GestureEvent::DragEnd(41.0),
        &settings.gesture,
    );
    assert_eq!(out, Some(GestureOutput::Decision(Decision::swipe(Direction::Accept))));
}

#[test]
fn test_feedback_is_capped() {
    let settings = GestureSettings::default();
    assert_eq!(feedback(0.0, &settings).ratio, 0.0);
    assert_eq!(feedback(-5000.0, &settings).ratio, settings.feedback_cap);
}

#[test]
fn test_match_detector_window_from_settings() {
    let mut settings = Settings::default();
    settings.matches.window_hours = 48;
    let mut detector = MatchDetector::new(settings.match_window());
    let now = Utc::now();

    let outcome = AcceptOutcome {
        action_id: Uuid::new_v4(),
        target_profile_id: ProfileId(5),
        is_match: true,
        matched_profile: Some(Profile::new(5, "Sofia")),
        match_id: Some(1),
        likes_count: None,
    };
    let m = detector.observe(&outcome, now).unwrap();

    assert_eq!(m.expires_at, now + Duration::hours(48));
}

#[test]
fn test_shared_queue_and_events_outside_runtime() {
    use campus_match::core::EventSink;
    use campus_match::FeedEvent;

    let queue = ProfileQueue::shared();
    let (events, mut rx) = EventSink::channel();

    tokio_test::block_on(async {
        let mut guard = queue.lock().await;
        guard.append(profiles(&[7, 8]));
        guard.promote_if_needed();
        events.emit(FeedEvent::SpringBack);
    });

    let length = tokio_test::block_on(async { queue.lock().await.length() });
    assert_eq!(length, 2);
    assert_eq!(rx.try_recv().ok(), Some(FeedEvent::SpringBack));
}
