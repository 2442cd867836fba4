//! Export of compiled programs to disk.
//!
//! An export writes two artifacts next to each other:
//! `<base>_arduino.json` (metadata plus the instruction list) and
//! `<base>_arduino.ino` (the rendered program).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use hidscript_common::error::{HidscriptError, HidscriptResult};
use hidscript_compiler::compile::CompiledProgram;
use hidscript_compiler::instruction::{DeviceInstruction, DeviceKey, DeviceOp};
use hidscript_compiler::keycodes;
use hidscript_recording_model::recording::{write_atomically, SessionMetadata};

use crate::sketch::ProgramRenderer;

const ARTIFACT_SUFFIX: &str = "_arduino";

/// An export ready to be written.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Artifact base path; suffix and extensions are appended.
    pub output_base: PathBuf,

    /// Metadata of the recording the program was compiled from.
    pub source: Option<SessionMetadata>,
}

/// Metadata stored in the exported JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Export timestamp (RFC 3339).
    pub exported: String,

    /// Number of instructions.
    pub instructions: usize,

    /// Number of compiler diagnostics (dropped or changed events).
    pub diagnostics: usize,

    /// Board the program targets.
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_created: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_duration_ms: Option<u64>,
}

/// The exported JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub instructions: Vec<DeviceInstruction>,
}

/// Paths and counts of a finished export.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub json_path: PathBuf,
    pub sketch_path: PathBuf,
    pub instruction_count: usize,
    pub diagnostic_count: usize,
}

impl ExportJob {
    pub fn new(output_base: impl Into<PathBuf>) -> Self {
        Self {
            output_base: output_base.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: SessionMetadata) -> Self {
        self.source = Some(source);
        self
    }

    /// Base path derived from a recording file: the same path without its
    /// extension.
    pub fn for_recording(recording_path: &Path) -> Self {
        Self::new(recording_path.with_extension(""))
    }

    /// `(<base>_arduino.json, <base>_arduino.ino)`.
    pub fn artifact_paths(&self) -> (PathBuf, PathBuf) {
        let artifact = |extension: &str| {
            let mut name = self
                .output_base
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "recording".into());
            name.push(ARTIFACT_SUFFIX);
            name.push(".");
            name.push(extension);
            self.output_base.with_file_name(name)
        };
        (artifact("json"), artifact("ino"))
    }
}

/// Write both artifacts for a compiled program.
///
/// Each file is written through a temporary sibling and renamed, so a
/// failed export never leaves a truncated artifact behind.
pub fn export_program(
    job: &ExportJob,
    program: &CompiledProgram,
    renderer: &ProgramRenderer,
) -> HidscriptResult<ExportReport> {
    if program.instructions.is_empty() {
        return Err(HidscriptError::render(
            "Nothing to export: the program has no instructions",
        ));
    }

    let (json_path, sketch_path) = job.artifact_paths();
    tracing::info!(
        json = %json_path.display(),
        sketch = %sketch_path.display(),
        instructions = program.instructions.len(),
        "Starting export"
    );

    if let Some(parent) = json_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let document = ExportDocument {
        metadata: ExportMetadata {
            exported: chrono::Utc::now().to_rfc3339(),
            instructions: program.instructions.len(),
            diagnostics: program.diagnostics.len(),
            target: renderer.settings().target_name.clone(),
            source_created: job.source.as_ref().map(|m| m.created.clone()),
            source_duration_ms: job.source.as_ref().map(|m| m.duration_ms),
        },
        instructions: program.instructions.clone(),
    };
    let json = serde_json::to_string_pretty(&document)?;
    write_atomically(&json_path, json.as_bytes())
        .map_err(|e| HidscriptError::render(e.to_string()))?;

    let sketch = renderer.render(&program.instructions);
    write_atomically(&sketch_path, sketch.as_bytes())
        .map_err(|e| HidscriptError::render(e.to_string()))?;

    tracing::info!(path = %sketch_path.display(), "Export complete");
    Ok(ExportReport {
        json_path,
        sketch_path,
        instruction_count: program.instructions.len(),
        diagnostic_count: program.diagnostics.len(),
    })
}

/// Load a previously exported JSON document.
///
/// Key constants must be ones the keycode table knows; a hand-edited
/// document naming anything else is rejected.
pub fn load_export(path: &Path) -> HidscriptResult<ExportDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            HidscriptError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            HidscriptError::Io(e)
        }
    })?;
    let document: ExportDocument = serde_json::from_str(&content)?;

    for instruction in &document.instructions {
        if let DeviceOp::KeyPress {
            key: DeviceKey::Constant(name),
        }
        | DeviceOp::KeyRelease {
            key: DeviceKey::Constant(name),
        } = &instruction.op
        {
            if keycodes::logical_key(name).is_none() {
                return Err(HidscriptError::render(format!(
                    "Unknown key constant {name} in {}",
                    path.display()
                )));
            }
        }
    }

    Ok(document)
}
