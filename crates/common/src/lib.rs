//! hidscript Common Utilities
//!
//! Shared infrastructure for all hidscript crates:
//! - Error types and result aliases
//! - Recording clock and pointer-move throttling
//! - Tracing/logging initialization
//! - Configuration loading and validation

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
