//! The in-memory audio configuration.

use tonecanvas_shared::BackendId;
use tonecanvas_shared::constants::{
    DEFAULT_BUFFER_TIME_US, DEFAULT_PERIOD_TIME_US, DEFAULT_SAMPLE_RATE_HZ,
};

/// Union of every backend's configurable fields.
///
/// Only the fields the selected backend's capabilities allow are meaningful.
/// The others keep whatever value they last had and are neither shown nor
/// persisted while that backend is selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationState {
    pub backend: BackendId,
    pub device: Option<String>,
    pub buffer_time_us: Option<u32>,
    pub period_time_us: Option<u32>,
    pub sample_rate_hz: u32,
    pub file_path: Option<String>,
}

impl ConfigurationState {
    /// Fresh state for `backend` with built-in defaults.
    pub fn new(backend: BackendId) -> Self {
        Self {
            backend,
            device: Some(String::new()),
            buffer_time_us: Some(DEFAULT_BUFFER_TIME_US),
            period_time_us: Some(DEFAULT_PERIOD_TIME_US),
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            file_path: Some(String::new()),
        }
    }

    /// Sample rate the backend will actually run at.
    ///
    /// Backends with a fixed rate override the stored value.
    pub fn effective_sample_rate(&self) -> u32 {
        self.backend
            .fixed_sample_rate()
            .unwrap_or(self.sample_rate_hz)
    }
}
