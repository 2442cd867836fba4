pub mod compile;
pub mod events;
pub mod info;
pub mod record;

use std::path::Path;

use hidscript_common::error::{HidscriptError, HidscriptResult};
use hidscript_recording_model::recording::{Recording, RecordingError};

/// Load a recording, mapping a missing file to `FileNotFound`.
pub fn load_recording(path: &Path) -> HidscriptResult<Recording> {
    Recording::load(path).map_err(|e| match e {
        RecordingError::IoError { ref source, .. }
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            HidscriptError::FileNotFound {
                path: path.to_path_buf(),
            }
        }
        other => HidscriptError::recording(other.to_string()),
    })
}

/// Save a recording, reporting failures as recording errors.
pub fn save_recording(recording: &Recording, path: &Path) -> HidscriptResult<()> {
    recording
        .save(path)
        .map_err(|e| HidscriptError::recording(e.to_string()))
}
