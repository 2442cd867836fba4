//! hidscript Render Engine
//!
//! Serializes compiled device instructions into an Arduino program and
//! writes the export artifacts.
//!
//! # Pipeline
//!
//! ```text
//! recording.json ──▶ compile ──▶ instructions ──┬──▶ <base>_arduino.json
//!                                               │
//!                                               └──▶ render ──▶ <base>_arduino.ino
//! ```

pub mod export;
pub mod sketch;

pub use export::{export_program, ExportDocument, ExportJob, ExportReport};
pub use sketch::ProgramRenderer;
