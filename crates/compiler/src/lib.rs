//! hidscript Compiler
//!
//! Turns a canonical input timeline into device instructions:
//! - **Keycode Table:** logical keys to device constants and literals
//! - **Motion Decomposer:** bounded-range splitting of pointer moves
//! - **Instruction Compiler:** the per-event translation and delay cleanup
//!
//! This crate is pure computation. All inputs are data; all outputs are data.

pub mod compile;
pub mod instruction;
pub mod keycodes;
pub mod motion;

pub use compile::{CompiledProgram, Diagnostic, InstructionCompiler};
pub use instruction::{DeviceButton, DeviceInstruction, DeviceKey, DeviceOp};
pub use motion::decompose;
