//! Instruction compiler.
//!
//! Turns a frozen canonical timeline into device instructions. A single
//! bad event never aborts compilation; it is dropped and reported as a
//! [`Diagnostic`].

use std::fmt;

use serde::{Deserialize, Serialize};

use hidscript_common::config::CompileSettings;
use hidscript_common::error::HidscriptResult;
use hidscript_recording_model::event::{ButtonState, CanonicalEvent, EventKind, MouseButton};
use hidscript_recording_model::key::LogicalKey;
use hidscript_recording_model::timeline::Timeline;

use crate::instruction::DeviceInstruction;
use crate::keycodes::{device_button, resolve_key};
use crate::motion::decompose;

/// Something the compiler dropped or changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A key with no device constant and no printable literal.
    UnmappableKey {
        index: usize,
        elapsed_ms: u64,
        key: LogicalKey,
    },

    /// A button without a device constant, replaced by the primary button.
    ButtonRemapped {
        index: usize,
        elapsed_ms: u64,
        button: MouseButton,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappableKey {
                index,
                elapsed_ms,
                key,
            } => write!(
                f,
                "event {index} at {elapsed_ms}ms: key {key} has no device mapping, dropped"
            ),
            Self::ButtonRemapped {
                index,
                elapsed_ms,
                button,
            } => write!(
                f,
                "event {index} at {elapsed_ms}ms: button {button:?} replaced by MOUSE_LEFT"
            ),
        }
    }
}

/// Output of one compilation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledProgram {
    pub instructions: Vec<DeviceInstruction>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledProgram {
    /// Sum of all instruction delays.
    pub fn total_delay_ms(&self) -> u64 {
        self.instructions.iter().map(|i| i.delay_ms).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Compiles canonical events into device instructions.
#[derive(Debug, Clone)]
pub struct InstructionCompiler {
    settings: CompileSettings,
}

impl InstructionCompiler {
    /// Create a compiler, rejecting invalid settings.
    pub fn new(settings: CompileSettings) -> HidscriptResult<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn with_defaults() -> Self {
        Self {
            settings: CompileSettings::default(),
        }
    }

    pub fn settings(&self) -> &CompileSettings {
        &self.settings
    }

    pub fn compile_timeline(&self, timeline: &Timeline) -> CompiledProgram {
        self.compile(timeline.events())
    }

    /// Compile events in order, then zero out sub-threshold delays.
    pub fn compile(&self, events: &[CanonicalEvent]) -> CompiledProgram {
        let mut program = CompiledProgram::default();
        for (index, event) in events.iter().enumerate() {
            self.compile_event(index, event, &mut program);
        }

        suppress_jitter(&mut program.instructions, self.settings.noise_threshold_ms);

        tracing::info!(
            events = events.len(),
            instructions = program.instructions.len(),
            diagnostics = program.diagnostics.len(),
            "Compiled timeline"
        );
        program
    }

    fn compile_event(&self, index: usize, event: &CanonicalEvent, program: &mut CompiledProgram) {
        let delay = event.delay_ms;
        match &event.kind {
            EventKind::Key { key, state } => match resolve_key(key) {
                Some(device_key) => program.instructions.push(match state {
                    ButtonState::Down => DeviceInstruction::key_press(delay, device_key),
                    ButtonState::Up => DeviceInstruction::key_release(delay, device_key),
                }),
                None => {
                    tracing::warn!(index, key = %key, "Dropping unmappable key");
                    program.diagnostics.push(Diagnostic::UnmappableKey {
                        index,
                        elapsed_ms: event.elapsed_ms,
                        key: key.clone(),
                    });
                }
            },

            EventKind::Button { button, state, .. } => {
                let (device, remapped) = device_button(*button);
                if remapped {
                    tracing::warn!(index, button = ?button, "Button has no device constant");
                    program.diagnostics.push(Diagnostic::ButtonRemapped {
                        index,
                        elapsed_ms: event.elapsed_ms,
                        button: *button,
                    });
                }
                program.instructions.push(match state {
                    ButtonState::Down => DeviceInstruction::mouse_press(delay, device),
                    ButtonState::Up => DeviceInstruction::mouse_release(delay, device),
                });
            }

            EventKind::Move { dx, dy, .. } => {
                let steps = decompose(*dx, *dy, self.settings.max_step);
                for (i, (step_x, step_y)) in steps.into_iter().enumerate() {
                    let step_delay = if i == 0 { delay } else { 0 };
                    // decompose keeps both components within the i8 range
                    program.instructions.push(DeviceInstruction::mouse_move(
                        step_delay,
                        step_x as i8,
                        step_y as i8,
                    ));
                }
            }

            EventKind::Scroll { dy, .. } => {
                let amount = (dy.trunc() as i32).saturating_mul(self.settings.scroll_factor);
                if amount != 0 {
                    program
                        .instructions
                        .push(DeviceInstruction::mouse_scroll(delay, amount));
                }
            }

            EventKind::Start { .. }
            | EventKind::Stop { .. }
            | EventKind::Pause
            | EventKind::Resume => {}
        }
    }
}

/// Zero every delay below `threshold_ms`.
pub fn suppress_jitter(instructions: &mut [DeviceInstruction], threshold_ms: u64) {
    for instruction in instructions.iter_mut() {
        if instruction.delay_ms < threshold_ms {
            instruction.delay_ms = 0;
        }
    }
}
