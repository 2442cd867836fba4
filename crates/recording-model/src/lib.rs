//! hidscript Recording Model
//!
//! Defines the data contracts shared by the recorder and the compiler:
//! - **Keys:** One `LogicalKey` type with a single canonical string form
//! - **Events:** Canonical, delay-annotated timeline events
//! - **Timeline:** Frozen, ordered event sequence
//! - **Recording:** Persisted timeline plus session metadata
//!
//! Positions are kept both in physical pixels and normalized to
//! `[0.0, 1.0]` against the capture screen.

pub mod event;
pub mod key;
pub mod recording;
pub mod timeline;

pub use event::*;
pub use key::*;
pub use recording::*;
pub use timeline::*;
