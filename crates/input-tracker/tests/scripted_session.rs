use std::path::PathBuf;

use hidscript_common::config::RecorderSettings;
use hidscript_input_tracker::backends::ScriptedBackend;
use hidscript_input_tracker::{
    InputTracker, RawInputEvent, SharedRecorder, StopReason, TimelineRecorder,
};
use hidscript_recording_model::event::{ButtonState, EventKind};
use hidscript_recording_model::key::LogicalKey;
use hidscript_recording_model::timeline::Timeline;
use proptest::prelude::*;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("sessions")
        .join("shifted_typing.jsonl")
}

async fn record_fixture() -> (hidscript_input_tracker::TrackerReport, Timeline) {
    let backend = ScriptedBackend::from_file(&fixture_path()).expect("fixture should load");
    let recorder = SharedRecorder::new(TimelineRecorder::new(RecorderSettings::default()));
    let mut tracker = InputTracker::new(Box::new(backend), recorder);
    let mut report = tracker.run().await.expect("tracker should run");
    let timeline = report.timeline.take().expect("timeline should be frozen");
    (report, timeline)
}

#[tokio::test]
async fn fixture_session_produces_expected_timeline() {
    let (report, timeline) = record_fixture().await;

    assert_eq!(report.reason, StopReason::Hotkey);
    assert_eq!(report.events_forwarded, 22);
    assert_eq!(report.events_appended, 15);

    let labels: Vec<&str> = timeline.iter().map(|e| e.kind.label()).collect();
    assert_eq!(
        labels,
        vec![
            "start",
            "key_down",
            "key_down",
            "key_up",
            "key_up",
            "key_down",
            "key_up",
            "key_down",
            "key_down",
            "key_up",
            "key_up",
            "move",
            "move",
            "button_down",
            "button_up",
            "scroll",
            "pause",
            "resume",
            "stop",
        ]
    );
    assert_eq!(timeline.duration_ms(), 1200);
}

#[tokio::test]
async fn fixture_session_resolves_shifted_characters() {
    let (_, timeline) = record_fixture().await;

    let typed: String = timeline
        .iter()
        .filter_map(|e| match &e.kind {
            EventKind::Key {
                key: LogicalKey::Char(c),
                state: ButtonState::Down,
            } => Some(*c),
            _ => None,
        })
        .collect();
    assert_eq!(typed, "Hi!");
}

#[tokio::test]
async fn fixture_session_filters_moves() {
    let (_, timeline) = record_fixture().await;

    let moves: Vec<(u64, i32, i32)> = timeline
        .iter()
        .filter_map(|e| match e.kind {
            EventKind::Move { dx, dy, .. } => Some((e.elapsed_ms, dx, dy)),
            _ => None,
        })
        .collect();
    assert_eq!(moves, vec![(500, 400, 300), (650, 300, 200)]);
}

fn arb_raw_event() -> impl Strategy<Value = (u64, u8, u16, u16)> {
    (0u64..50, 0u8..6, 0u16..1920, 0u16..1080)
}

proptest! {
    #[test]
    fn recorded_timelines_keep_delay_invariants(steps in proptest::collection::vec(arb_raw_event(), 0..80)) {
        let mut recorder = TimelineRecorder::new(RecorderSettings::default());
        recorder.start_at(0).unwrap();

        let mut now = 0u64;
        for (gap, kind, x, y) in steps {
            now += gap;
            let (x, y) = (x as i32, y as i32);
            let event = match kind {
                0 => RawInputEvent::key_down(now, LogicalKey::ShiftLeft),
                1 => RawInputEvent::key_up(now, LogicalKey::ShiftLeft),
                2 => RawInputEvent::key_down(now, LogicalKey::CtrlRight),
                3 => RawInputEvent::key_down(now, "a"),
                4 => RawInputEvent::pointer_move(now, x, y),
                _ => RawInputEvent::scroll(now, x, y, 0.0, 1.0),
            };
            recorder.record(event);
        }
        recorder.stop_at(now + 10);
        let timeline = recorder.take_timeline().unwrap();

        let total: u64 = timeline.iter().map(|e| e.delay_ms).sum();
        prop_assert_eq!(total, timeline.duration_ms());
        prop_assert_eq!(timeline.events()[0].elapsed_ms, 0);
        prop_assert!(matches!(timeline.events()[timeline.len() - 1].kind, EventKind::Stop { .. }), "last event must be Stop");

        // every modifier press has a matching release
        let mut held = 0i32;
        for event in timeline.iter() {
            if let EventKind::Key { key, state } = &event.kind {
                if key.is_modifier() {
                    held += if *state == ButtonState::Down { 1 } else { -1 };
                    prop_assert!(held >= 0);
                }
            }
        }
        prop_assert_eq!(held, 0);
    }
}
