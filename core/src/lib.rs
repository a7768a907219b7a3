//! Tonecanvas Core - audio output configuration
//!
//! This crate decides which audio backend the application uses and which
//! parameters are valid for it. It does not stream audio.
//!
//! # Architecture
//!
//! - [`BackendRegistry`] - Backends compiled into this build, with capability flags
//! - [`DeviceEnumerator`] - Uniform device listing over each backend's native API
//! - [`ConfigForm`] - One configuration session: backend switching, field
//!   visibility, input validation, commit/discard
//! - [`settings`] - Load/save between a [`ConfigurationState`] and a
//!   [`SettingsStore`]
//!
//! # Cargo features
//!
//! Each optional backend has a feature (`alsa`, `jack`, `pulse`, `generic`,
//! `wav`, `win32`, `coreaudio`). The Null backend is always present.

pub mod audio;
#[cfg(test)]
mod integration;
pub mod settings;
#[cfg(test)]
pub mod test_utils;

// Re-export the configuration engine
pub use audio::{
    BackendDescriptor, BackendRegistry, ConfigForm, ConfigurationState,
    DEFAULT_ENUMERATION_TIMEOUT, DeviceEnumerator, EnumerationError, FORM_TITLE, FieldView,
    FileChooser, FormError, FormView, ListDevicesFn, NativeEnumerator, RegistryError,
    WAV_FILE_DIALOG_TITLE,
};

// Re-export persistence types
pub use settings::{MemoryStore, SettingsStore, StoreError, TomlFileStore};

// Re-export shared types for convenience
pub use tonecanvas_shared::{BackendId, CapabilitySet, Field, FieldState, constants};
