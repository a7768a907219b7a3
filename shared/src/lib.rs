//! Shared types for Tonecanvas audio output configuration.
//!
//! Backend identifiers, their capability flags, the configurable fields and
//! the settings keys they persist under. Used by the core configuration
//! engine and by every front end.

pub mod backend;
pub mod constants;

pub use backend::{BackendId, CapabilitySet, Field, FieldState, ParseBackendError};
