//! Backend selection on platforms without a native capture backend.

use hidscript_common::config::RecorderSettings;

use crate::InputBackend;

pub fn detect_best_backend(settings: &RecorderSettings) -> Box<dyn InputBackend> {
    tracing::warn!(
        "Input capture backends for this platform are not implemented yet; using stub backend"
    );
    super::stub_for(settings)
}
