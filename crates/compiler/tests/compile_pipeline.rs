use hidscript_common::config::CompileSettings;
use hidscript_compiler::{DeviceInstruction, DeviceKey, DeviceOp, InstructionCompiler};
use hidscript_recording_model::event::{ButtonState, EventKind};
use hidscript_recording_model::key::LogicalKey;
use hidscript_recording_model::timeline::{Timeline, TimelineBuilder};
use proptest::prelude::*;

fn start_marker() -> EventKind {
    EventKind::Start {
        wall_clock: "2026-01-01T00:00:00Z".to_string(),
        screen_width: 1920,
        screen_height: 1080,
    }
}

fn key(key: LogicalKey, state: ButtonState) -> EventKind {
    EventKind::Key { key, state }
}

fn relative_move(dx: i32, dy: i32) -> EventKind {
    EventKind::Move {
        x: dx,
        y: dy,
        dx,
        dy,
        norm_x: dx as f64 / 1920.0,
        norm_y: dy as f64 / 1080.0,
    }
}

fn reference_timeline() -> Timeline {
    let mut builder = TimelineBuilder::new();
    builder.push(0, start_marker());
    builder.push(100, key(LogicalKey::Char('a'), ButtonState::Down));
    builder.push(150, key(LogicalKey::Char('a'), ButtonState::Up));
    builder.push(400, relative_move(300, 0));
    builder.push(450, EventKind::Stop { duration_ms: 450 });
    builder.finalize()
}

#[test]
fn reference_session_compiles_to_expected_instructions() {
    let program = InstructionCompiler::with_defaults().compile_timeline(&reference_timeline());

    assert_eq!(
        program.instructions,
        vec![
            DeviceInstruction::key_press(100, DeviceKey::Literal('a')),
            DeviceInstruction::key_release(50, DeviceKey::Literal('a')),
            DeviceInstruction::mouse_move(250, 127, 0),
            DeviceInstruction::mouse_move(0, 127, 0),
            DeviceInstruction::mouse_move(0, 46, 0),
        ]
    );
    assert!(program.diagnostics.is_empty());
    assert_eq!(program.total_delay_ms(), 400);
}

#[test]
fn shortcut_chord_keeps_constant_and_literal() {
    let mut builder = TimelineBuilder::new();
    builder.push(0, start_marker());
    builder.push(30, key(LogicalKey::CtrlLeft, ButtonState::Down));
    builder.push(35, key(LogicalKey::Char('c'), ButtonState::Down));
    builder.push(90, key(LogicalKey::Char('c'), ButtonState::Up));
    builder.push(120, key(LogicalKey::CtrlLeft, ButtonState::Up));
    let program = InstructionCompiler::with_defaults().compile_timeline(&builder.finalize());

    let ctrl = DeviceKey::Constant("KEY_LEFT_CTRL".to_string());
    assert_eq!(
        program.instructions,
        vec![
            DeviceInstruction::key_press(30, ctrl.clone()),
            // 5ms is below the jitter threshold
            DeviceInstruction::key_press(0, DeviceKey::Literal('c')),
            DeviceInstruction::key_release(55, DeviceKey::Literal('c')),
            DeviceInstruction::key_release(30, ctrl),
        ]
    );
}

#[test]
fn compiled_program_round_trips_through_json() {
    let program = InstructionCompiler::with_defaults().compile_timeline(&reference_timeline());
    let json = serde_json::to_string(&program.instructions).unwrap();
    let parsed: Vec<DeviceInstruction> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, program.instructions);
}

proptest! {
    #[test]
    fn moves_stay_in_device_range_and_keep_displacement(
        moves in proptest::collection::vec((-2_000i32..2_000, -2_000i32..2_000, 0u64..200), 1..40)
    ) {
        let mut builder = TimelineBuilder::new();
        let mut t = 0;
        for (dx, dy, gap) in &moves {
            t += gap;
            builder.push(t, relative_move(*dx, *dy));
        }
        let timeline = builder.finalize();

        let compiler = InstructionCompiler::new(CompileSettings {
            noise_threshold_ms: 0,
            ..Default::default()
        }).unwrap();
        let program = compiler.compile_timeline(&timeline);

        let (mut sum_x, mut sum_y) = (0i64, 0i64);
        for instruction in &program.instructions {
            match instruction.op {
                DeviceOp::MouseMove { dx, dy } => {
                    prop_assert!(dx >= -127 && dy >= -127);
                    sum_x += dx as i64;
                    sum_y += dy as i64;
                }
                ref other => prop_assert!(false, "unexpected op {:?}", other),
            }
        }
        prop_assert_eq!(sum_x, moves.iter().map(|m| m.0 as i64).sum::<i64>());
        prop_assert_eq!(sum_y, moves.iter().map(|m| m.1 as i64).sum::<i64>());

        // zero moves drop their delay, everything else is carried once
        let carried: u64 = timeline
            .iter()
            .filter(|e| !matches!(e.kind, EventKind::Move { dx: 0, dy: 0, .. }))
            .map(|e| e.delay_ms)
            .sum();
        prop_assert_eq!(program.total_delay_ms(), carried);
    }
}
