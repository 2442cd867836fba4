//! The timeline recorder state machine.
//!
//! ```text
//!   Idle ──start──▶ Recording ◀──toggle_pause──▶ Paused
//!                       │                           │
//!                       └────────────stop───────────┘
//!                                     ▼
//!                                  Stopped ──start──▶ Recording
//! ```
//!
//! Elapsed times are capture timestamps minus the start timestamp. Time
//! spent paused is not subtracted; paused input is simply dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hidscript_common::clock::MoveThrottle;
use hidscript_common::config::RecorderSettings;
use hidscript_common::error::{HidscriptError, HidscriptResult};
use hidscript_recording_model::event::{normalize, ButtonState, EventKind};
use hidscript_recording_model::key::LogicalKey;
use hidscript_recording_model::timeline::{Timeline, TimelineBuilder};

use crate::modifiers::ModifierTracker;
use crate::raw::{RawEventKind, RawInputEvent};

/// Lifecycle state of a recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// Created, never started.
    Idle,
    /// Appending events.
    Recording,
    /// Dropping input until resumed.
    Paused,
    /// Timeline frozen.
    Stopped,
}

/// What `record` did with a raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A canonical event was appended.
    Appended,
    /// A control hotkey changed the recorder state.
    Hotkey(RecorderState),
    /// The event was dropped.
    Discarded(DiscardReason),
}

/// Why a raw event did not reach the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    NotRecording,
    Paused,
    MovesDisabled,
    MoveTooSoon,
    MoveTooSmall,
    RepeatedModifier,
    HotkeyRelease,
}

/// Records raw input into a canonical timeline.
#[derive(Debug)]
pub struct TimelineRecorder {
    settings: RecorderSettings,
    pause_hotkey: Option<LogicalKey>,
    stop_hotkey: Option<LogicalKey>,
    state: RecorderState,
    start_ms: u64,
    timeline: TimelineBuilder,
    frozen: Option<Timeline>,
    modifiers: ModifierTracker,
    last_position: (i32, i32),
    move_throttle: MoveThrottle,
}

impl TimelineRecorder {
    /// Create an idle recorder.
    pub fn new(settings: RecorderSettings) -> Self {
        let pause_hotkey = settings.pause_hotkey.as_deref().map(LogicalKey::parse);
        let stop_hotkey = settings.stop_hotkey.as_deref().map(LogicalKey::parse);
        let move_throttle = MoveThrottle::new(settings.move_interval_ms());
        Self {
            settings,
            pause_hotkey,
            stop_hotkey,
            state: RecorderState::Idle,
            start_ms: 0,
            timeline: TimelineBuilder::new(),
            frozen: None,
            modifiers: ModifierTracker::new(),
            last_position: (0, 0),
            move_throttle,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn settings(&self) -> &RecorderSettings {
        &self.settings
    }

    /// Events appended in the current session so far.
    pub fn event_count(&self) -> usize {
        self.timeline.len()
    }

    /// Set the move interval; invalid values keep the previous one.
    pub fn set_move_interval_ms(&mut self, ms: u64) -> HidscriptResult<()> {
        self.settings.set_move_interval_ms(ms)?;
        self.move_throttle.set_interval_ms(ms);
        Ok(())
    }

    /// Set the minimum move distance; invalid values keep the previous one.
    pub fn set_min_move_px(&mut self, px: u32) -> HidscriptResult<()> {
        self.settings.set_min_move_px(px)
    }

    pub fn set_record_moves(&mut self, enabled: bool) {
        self.settings.record_moves = enabled;
    }

    /// Begin a new session at capture time `now_ms`.
    ///
    /// Clears any previous timeline and modifier state and records the
    /// start marker at elapsed 0.
    pub fn start_at(&mut self, now_ms: u64) -> HidscriptResult<()> {
        if matches!(self.state, RecorderState::Recording | RecorderState::Paused) {
            return Err(HidscriptError::invalid_state("a recording is already active"));
        }

        self.modifiers.reset();
        self.timeline.clear();
        self.frozen = None;
        self.last_position = (0, 0);
        self.move_throttle.reset();
        self.start_ms = now_ms;
        self.state = RecorderState::Recording;

        self.timeline.push(
            0,
            EventKind::Start {
                wall_clock: chrono::Utc::now().to_rfc3339(),
                screen_width: self.settings.screen_width,
                screen_height: self.settings.screen_height,
            },
        );

        tracing::info!(
            screen_width = self.settings.screen_width,
            screen_height = self.settings.screen_height,
            "Recording started"
        );
        Ok(())
    }

    /// Toggle between Recording and Paused, emitting the matching marker.
    pub fn toggle_pause_at(&mut self, now_ms: u64) -> HidscriptResult<RecorderState> {
        let elapsed = self.elapsed(now_ms);
        match self.state {
            RecorderState::Recording => {
                self.timeline.push(elapsed, EventKind::Pause);
                self.state = RecorderState::Paused;
                tracing::info!(elapsed_ms = elapsed, "Recording paused");
            }
            RecorderState::Paused => {
                self.timeline.push(elapsed, EventKind::Resume);
                self.state = RecorderState::Recording;
                tracing::info!(elapsed_ms = elapsed, "Recording resumed");
            }
            RecorderState::Idle | RecorderState::Stopped => {
                return Err(HidscriptError::invalid_state("no active recording to pause"));
            }
        }
        Ok(self.state)
    }

    /// Stop the session and freeze the timeline.
    ///
    /// Held modifiers get a synthesized key-up before the stop marker.
    /// Returns `false` when there was no active session (stopping twice is
    /// harmless).
    pub fn stop_at(&mut self, now_ms: u64) -> bool {
        if !matches!(self.state, RecorderState::Recording | RecorderState::Paused) {
            return false;
        }

        let end_ms = self.elapsed(now_ms).max(self.timeline.last_elapsed_ms());
        for key in self.modifiers.release_all() {
            tracing::debug!(key = %key, "Releasing held modifier at stop");
            self.timeline.push(
                end_ms,
                EventKind::Key {
                    key,
                    state: ButtonState::Up,
                },
            );
        }
        self.timeline
            .push(end_ms, EventKind::Stop { duration_ms: end_ms });

        let timeline = std::mem::take(&mut self.timeline).finalize();
        tracing::info!(
            events = timeline.len(),
            duration_ms = end_ms,
            "Recording stopped"
        );
        self.frozen = Some(timeline);
        self.state = RecorderState::Stopped;
        true
    }

    /// Move the frozen timeline out of the recorder.
    pub fn take_timeline(&mut self) -> Option<Timeline> {
        self.frozen.take()
    }

    /// Feed one raw event into the recorder.
    pub fn record(&mut self, event: RawInputEvent) -> RecordOutcome {
        let at_ms = event.captured_at_ms;

        if matches!(self.state, RecorderState::Recording | RecorderState::Paused) {
            if let Some(outcome) = self.handle_hotkey(&event.kind, at_ms) {
                return outcome;
            }
        }

        match self.state {
            RecorderState::Recording => {}
            RecorderState::Paused => return RecordOutcome::Discarded(DiscardReason::Paused),
            RecorderState::Idle | RecorderState::Stopped => {
                return RecordOutcome::Discarded(DiscardReason::NotRecording)
            }
        }

        let elapsed = self.elapsed(at_ms);
        match event.kind {
            RawEventKind::KeyDown { key } => self.record_key(elapsed, &key, ButtonState::Down),
            RawEventKind::KeyUp { key } => self.record_key(elapsed, &key, ButtonState::Up),
            RawEventKind::PointerDown { button, x, y } => {
                self.record_button(elapsed, button, ButtonState::Down, x, y)
            }
            RawEventKind::PointerUp { button, x, y } => {
                self.record_button(elapsed, button, ButtonState::Up, x, y)
            }
            RawEventKind::PointerMove { x, y } => self.record_move(elapsed, at_ms, x, y),
            RawEventKind::PointerScroll { x, y, dx, dy } => {
                self.timeline
                    .push(elapsed, EventKind::Scroll { x, y, dx, dy });
                RecordOutcome::Appended
            }
        }
    }

    fn handle_hotkey(&mut self, kind: &RawEventKind, at_ms: u64) -> Option<RecordOutcome> {
        let (key, pressed) = match kind {
            RawEventKind::KeyDown { key } => (key, true),
            RawEventKind::KeyUp { key } => (key, false),
            _ => return None,
        };

        let is_stop = self.stop_hotkey.as_ref() == Some(key);
        let is_pause = self.pause_hotkey.as_ref() == Some(key);
        if !is_stop && !is_pause {
            return None;
        }
        if !pressed {
            return Some(RecordOutcome::Discarded(DiscardReason::HotkeyRelease));
        }

        if is_stop {
            self.stop_at(at_ms);
            return Some(RecordOutcome::Hotkey(self.state));
        }
        // state is Recording or Paused here, so toggling cannot fail
        let state = self.toggle_pause_at(at_ms).unwrap_or(self.state);
        Some(RecordOutcome::Hotkey(state))
    }

    fn record_key(&mut self, elapsed: u64, raw: &LogicalKey, state: ButtonState) -> RecordOutcome {
        match self.modifiers.resolve(raw, state == ButtonState::Down) {
            Some(key) => {
                self.timeline.push(elapsed, EventKind::Key { key, state });
                RecordOutcome::Appended
            }
            None => RecordOutcome::Discarded(DiscardReason::RepeatedModifier),
        }
    }

    fn record_button(
        &mut self,
        elapsed: u64,
        button: hidscript_recording_model::event::MouseButton,
        state: ButtonState,
        x: i32,
        y: i32,
    ) -> RecordOutcome {
        self.timeline.push(
            elapsed,
            EventKind::Button {
                button,
                state,
                x,
                y,
                norm_x: normalize(x, self.settings.screen_width),
                norm_y: normalize(y, self.settings.screen_height),
            },
        );
        self.last_position = (x, y);
        RecordOutcome::Appended
    }

    fn record_move(&mut self, elapsed: u64, at_ms: u64, x: i32, y: i32) -> RecordOutcome {
        if !self.settings.record_moves {
            return RecordOutcome::Discarded(DiscardReason::MovesDisabled);
        }
        if !self.move_throttle.is_ready(at_ms) {
            return RecordOutcome::Discarded(DiscardReason::MoveTooSoon);
        }

        let (last_x, last_y) = self.last_position;
        let dx = i64::from(x) - i64::from(last_x);
        let dy = i64::from(y) - i64::from(last_y);
        let min = u64::from(self.settings.min_move_px());
        if dx.unsigned_abs() < min && dy.unsigned_abs() < min {
            tracing::trace!(dx, dy, "Move below threshold");
            return RecordOutcome::Discarded(DiscardReason::MoveTooSmall);
        }

        self.move_throttle.mark(at_ms);
        self.last_position = (x, y);
        self.timeline.push(
            elapsed,
            EventKind::Move {
                x,
                y,
                dx: saturate_i32(dx),
                dy: saturate_i32(dy),
                norm_x: normalize(x, self.settings.screen_width),
                norm_y: normalize(y, self.settings.screen_height),
            },
        );
        RecordOutcome::Appended
    }

    fn elapsed(&self, at_ms: u64) -> u64 {
        at_ms.saturating_sub(self.start_ms)
    }
}

fn saturate_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Cloneable handle that serializes access to one recorder.
///
/// Keyboard and pointer notifications may arrive on different threads;
/// every transition and append goes through the same lock.
#[derive(Debug, Clone)]
pub struct SharedRecorder {
    inner: Arc<Mutex<TimelineRecorder>>,
}

impl SharedRecorder {
    pub fn new(recorder: TimelineRecorder) -> Self {
        Self {
            inner: Arc::new(Mutex::new(recorder)),
        }
    }

    /// Lock the recorder. A panic on another capture thread does not
    /// leave the timeline half-written, so a poisoned lock is reclaimed.
    pub fn lock(&self) -> MutexGuard<'_, TimelineRecorder> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start_at(&self, now_ms: u64) -> HidscriptResult<()> {
        self.lock().start_at(now_ms)
    }

    pub fn toggle_pause_at(&self, now_ms: u64) -> HidscriptResult<RecorderState> {
        self.lock().toggle_pause_at(now_ms)
    }

    pub fn stop_at(&self, now_ms: u64) -> bool {
        self.lock().stop_at(now_ms)
    }

    pub fn record(&self, event: RawInputEvent) -> RecordOutcome {
        self.lock().record(event)
    }

    pub fn state(&self) -> RecorderState {
        self.lock().state()
    }

    pub fn take_timeline(&self) -> Option<Timeline> {
        self.lock().take_timeline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hidscript_recording_model::event::{CanonicalEvent, MouseButton};

    fn recorder() -> TimelineRecorder {
        TimelineRecorder::new(RecorderSettings::default())
    }

    fn kinds(timeline: &Timeline) -> Vec<&'static str> {
        timeline.iter().map(|e| e.kind.label()).collect()
    }

    fn key_event(event: &CanonicalEvent) -> Option<(LogicalKey, ButtonState)> {
        match &event.kind {
            EventKind::Key { key, state } => Some((key.clone(), *state)),
            _ => None,
        }
    }

    #[test]
    fn test_start_records_marker_at_zero() {
        let mut rec = recorder();
        rec.start_at(5_000).unwrap();
        rec.stop_at(5_000);
        let timeline = rec.take_timeline().unwrap();
        assert_eq!(kinds(&timeline), vec!["start", "stop"]);
        assert_eq!(timeline.events()[0].elapsed_ms, 0);
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut rec = recorder();
        rec.start_at(0).unwrap();
        assert!(rec.start_at(10).is_err());
        assert_eq!(rec.state(), RecorderState::Recording);
    }

    #[test]
    fn test_events_before_start_are_ignored() {
        let mut rec = recorder();
        let outcome = rec.record(RawInputEvent::key_down(10, 'a'.to_string()));
        assert_eq!(
            outcome,
            RecordOutcome::Discarded(DiscardReason::NotRecording)
        );
    }

    #[test]
    fn test_elapsed_is_relative_to_start() {
        let mut rec = recorder();
        rec.start_at(1_000).unwrap();
        rec.record(RawInputEvent::key_down(1_100, "a"));
        rec.record(RawInputEvent::key_up(1_150, "a"));
        rec.stop_at(1_450);
        let timeline = rec.take_timeline().unwrap();

        let elapsed: Vec<u64> = timeline.iter().map(|e| e.elapsed_ms).collect();
        let delays: Vec<u64> = timeline.iter().map(|e| e.delay_ms).collect();
        assert_eq!(elapsed, vec![0, 100, 150, 450]);
        assert_eq!(delays, vec![0, 100, 50, 300]);
    }

    #[test]
    fn test_stop_releases_held_ctrl_before_marker() {
        let mut rec = recorder();
        rec.start_at(0).unwrap();
        rec.record(RawInputEvent::key_down(10, LogicalKey::CtrlLeft));
        rec.record(RawInputEvent::key_down(20, "c"));
        rec.stop_at(100);
        let timeline = rec.take_timeline().unwrap();

        let events = timeline.events();
        let n = events.len();
        assert_eq!(
            key_event(&events[n - 2]),
            Some((LogicalKey::CtrlLeft, ButtonState::Up))
        );
        assert_eq!(events[n - 1].kind, EventKind::Stop { duration_ms: 100 });
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut rec = recorder();
        rec.start_at(0).unwrap();
        assert!(rec.stop_at(10));
        assert!(!rec.stop_at(20));
        assert_eq!(rec.take_timeline().unwrap().len(), 2);
        assert!(rec.take_timeline().is_none());
    }

    #[test]
    fn test_paused_input_is_dropped_and_time_keeps_running() {
        let mut rec = recorder();
        rec.start_at(0).unwrap();
        rec.toggle_pause_at(100).unwrap();
        assert_eq!(
            rec.record(RawInputEvent::key_down(150, "x")),
            RecordOutcome::Discarded(DiscardReason::Paused)
        );
        rec.toggle_pause_at(300).unwrap();
        rec.record(RawInputEvent::key_down(350, "y"));
        rec.stop_at(400);
        let timeline = rec.take_timeline().unwrap();

        assert_eq!(
            kinds(&timeline),
            vec!["start", "pause", "resume", "key_down", "stop"]
        );
        // pause duration is not subtracted
        assert_eq!(timeline.events()[3].elapsed_ms, 350);
    }

    #[test]
    fn test_toggle_pause_requires_active_session() {
        let mut rec = recorder();
        assert!(rec.toggle_pause_at(0).is_err());
    }

    #[test]
    fn test_shifted_characters_are_resolved() {
        let mut rec = recorder();
        rec.start_at(0).unwrap();
        rec.record(RawInputEvent::key_down(10, LogicalKey::ShiftLeft));
        rec.record(RawInputEvent::key_down(20, "1"));
        rec.record(RawInputEvent::key_down(30, LogicalKey::ShiftLeft));
        rec.record(RawInputEvent::key_up(40, LogicalKey::ShiftLeft));
        rec.record(RawInputEvent::key_down(50, "1"));
        rec.stop_at(60);
        let timeline = rec.take_timeline().unwrap();

        let keys: Vec<_> = timeline.iter().filter_map(key_event).collect();
        assert_eq!(
            keys,
            vec![
                (LogicalKey::ShiftLeft, ButtonState::Down),
                (LogicalKey::Char('!'), ButtonState::Down),
                (LogicalKey::ShiftLeft, ButtonState::Up),
                (LogicalKey::Char('1'), ButtonState::Down),
            ]
        );
    }

    #[test]
    fn test_move_filter_distance_and_interval() {
        let mut rec = recorder();
        rec.start_at(0).unwrap();
        assert_eq!(
            rec.record(RawInputEvent::pointer_move(10, 100, 100)),
            RecordOutcome::Appended
        );
        // too soon
        assert_eq!(
            rec.record(RawInputEvent::pointer_move(40, 200, 200)),
            RecordOutcome::Discarded(DiscardReason::MoveTooSoon)
        );
        // too small
        assert_eq!(
            rec.record(RawInputEvent::pointer_move(70, 104, 96)),
            RecordOutcome::Discarded(DiscardReason::MoveTooSmall)
        );
        // a rejected small move does not consume the interval
        assert_eq!(
            rec.record(RawInputEvent::pointer_move(71, 105, 100)),
            RecordOutcome::Appended
        );
        rec.stop_at(100);
        let timeline = rec.take_timeline().unwrap();

        let moves: Vec<(i32, i32)> = timeline
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::Move { dx, dy, .. } => Some((dx, dy)),
                _ => None,
            })
            .collect();
        assert_eq!(moves, vec![(100, 100), (5, 0)]);
    }

    #[test]
    fn test_clicks_update_move_origin() {
        let mut rec = recorder();
        rec.start_at(0).unwrap();
        rec.record(RawInputEvent::pointer_down(10, MouseButton::Left, 500, 500));
        rec.record(RawInputEvent::pointer_up(20, MouseButton::Left, 500, 500));
        rec.record(RawInputEvent::pointer_move(30, 520, 500));
        rec.stop_at(40);
        let timeline = rec.take_timeline().unwrap();

        let last_move = timeline
            .iter()
            .find_map(|e| match e.kind {
                EventKind::Move { dx, dy, .. } => Some((dx, dy)),
                _ => None,
            })
            .unwrap();
        assert_eq!(last_move, (20, 0));
    }

    #[test]
    fn test_moves_can_be_disabled() {
        let mut rec = recorder();
        rec.set_record_moves(false);
        rec.start_at(0).unwrap();
        assert_eq!(
            rec.record(RawInputEvent::pointer_move(10, 300, 300)),
            RecordOutcome::Discarded(DiscardReason::MovesDisabled)
        );
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let mut rec = recorder();
        rec.start_at(0).unwrap();
        assert_eq!(
            rec.record(RawInputEvent::pointer_move(10, i32::MIN, 0)),
            RecordOutcome::Appended
        );
        rec.record(RawInputEvent::pointer_down(20, MouseButton::Left, i32::MIN, i32::MIN));
        assert_eq!(
            rec.record(RawInputEvent::pointer_move(100, i32::MAX, i32::MAX)),
            RecordOutcome::Appended
        );
        assert_eq!(
            rec.record(RawInputEvent::pointer_move(200, i32::MAX - 2, i32::MAX)),
            RecordOutcome::Discarded(DiscardReason::MoveTooSmall)
        );
        rec.stop_at(300);

        let timeline = rec.take_timeline().unwrap();
        let deltas: Vec<(i32, i32)> = timeline
            .iter()
            .filter_map(|e| match e.kind {
                EventKind::Move { dx, dy, .. } => Some((dx, dy)),
                _ => None,
            })
            .collect();
        assert_eq!(deltas[1], (i32::MAX, i32::MAX));
    }

    #[test]
    fn test_invalid_interval_is_rejected_and_kept() {
        let mut rec = recorder();
        assert!(rec.set_move_interval_ms(2_000).is_err());
        assert_eq!(rec.settings().move_interval_ms(), 50);
        rec.set_move_interval_ms(100).unwrap();
        assert_eq!(rec.settings().move_interval_ms(), 100);
    }

    #[test]
    fn test_normalized_positions() {
        let mut rec = recorder();
        rec.start_at(0).unwrap();
        rec.record(RawInputEvent::pointer_down(5, MouseButton::Right, 960, 540));
        rec.stop_at(10);
        let timeline = rec.take_timeline().unwrap();
        match timeline.events()[1].kind {
            EventKind::Button { norm_x, norm_y, .. } => {
                assert!((norm_x - 0.5).abs() < 1e-9);
                assert!((norm_y - 0.5).abs() < 1e-9);
            }
            ref other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_pause_hotkey_toggles_even_while_paused() {
        let mut rec = recorder();
        rec.start_at(0).unwrap();
        assert_eq!(
            rec.record(RawInputEvent::key_down(10, LogicalKey::F(1))),
            RecordOutcome::Hotkey(RecorderState::Paused)
        );
        assert_eq!(
            rec.record(RawInputEvent::key_up(20, LogicalKey::F(1))),
            RecordOutcome::Discarded(DiscardReason::HotkeyRelease)
        );
        assert_eq!(
            rec.record(RawInputEvent::key_down(30, LogicalKey::F(1))),
            RecordOutcome::Hotkey(RecorderState::Recording)
        );
        rec.stop_at(40);
        let timeline = rec.take_timeline().unwrap();
        assert_eq!(kinds(&timeline), vec!["start", "pause", "resume", "stop"]);
    }

    #[test]
    fn test_stop_hotkey_freezes_timeline() {
        let mut rec = recorder();
        rec.start_at(0).unwrap();
        rec.record(RawInputEvent::key_down(10, LogicalKey::ShiftLeft));
        assert_eq!(
            rec.record(RawInputEvent::key_down(50, LogicalKey::Esc)),
            RecordOutcome::Hotkey(RecorderState::Stopped)
        );
        let timeline = rec.take_timeline().unwrap();
        assert_eq!(kinds(&timeline), vec!["start", "key_down", "key_up", "stop"]);
        assert_eq!(timeline.duration_ms(), 50);
    }

    #[test]
    fn test_restart_clears_previous_session() {
        let mut rec = recorder();
        rec.start_at(0).unwrap();
        rec.record(RawInputEvent::key_down(10, LogicalKey::CtrlLeft));
        rec.stop_at(20);
        rec.start_at(100).unwrap();
        assert!(rec.take_timeline().is_none());
        rec.record(RawInputEvent::key_down(110, "z"));
        rec.stop_at(120);
        let timeline = rec.take_timeline().unwrap();
        // no stale CTRL release from the first session
        assert_eq!(kinds(&timeline), vec!["start", "key_down", "stop"]);
    }

    #[test]
    fn test_shared_recorder_serializes_concurrent_producers() {
        let shared = SharedRecorder::new(recorder());
        shared.start_at(0).unwrap();

        let keyboard = {
            let shared = shared.clone();
            std::thread::spawn(move || {
                for i in 0..200u64 {
                    shared.record(RawInputEvent::key_down(i, "k"));
                }
            })
        };
        let pointer = {
            let shared = shared.clone();
            std::thread::spawn(move || {
                for i in 0..200u64 {
                    shared.record(RawInputEvent::scroll(i, 0, 0, 0.0, 1.0));
                }
            })
        };
        keyboard.join().unwrap();
        pointer.join().unwrap();

        assert!(shared.stop_at(500));
        assert!(!shared.stop_at(600));
        let timeline = shared.take_timeline().unwrap();
        assert_eq!(timeline.len(), 402);
        for pair in timeline.events().windows(2) {
            assert!(pair[0].elapsed_ms <= pair[1].elapsed_ms);
        }
        let total: u64 = timeline.iter().map(|e| e.delay_ms).sum();
        assert_eq!(total, timeline.duration_ms());
    }
}
