//! Registry of audio backends compiled into this build.

use serde::Serialize;
use tonecanvas_shared::{BackendId, CapabilitySet};

use super::devices::EnumerationError;
use super::native;

/// Native device listing routine of a backend.
///
/// Blocking; the enumerator runs it on a helper thread with a timeout.
pub type ListDevicesFn = fn() -> Result<Vec<String>, EnumerationError>;

/// A registered backend: identity, capabilities and device-listing hook.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BackendDescriptor {
    pub id: BackendId,
    pub display_name: &'static str,
    pub capabilities: CapabilitySet,
    #[serde(skip)]
    list_devices: Option<ListDevicesFn>,
}

impl BackendDescriptor {
    /// Descriptor with the capabilities and native listing routine of `id`.
    pub fn new(id: BackendId) -> Self {
        Self {
            id,
            display_name: id.display_name(),
            capabilities: id.capabilities(),
            list_devices: native::lister_for(id),
        }
    }

    /// Replace the native listing routine.
    ///
    /// Has no effect on enumeration unless the backend has a device list.
    pub fn with_device_lister(mut self, lister: ListDevicesFn) -> Self {
        self.list_devices = Some(lister);
        self
    }

    /// The listing routine, if the backend has one.
    pub fn device_lister(&self) -> Option<ListDevicesFn> {
        self.list_devices
    }
}

/// Registry lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("audio backend '{0}' is not available in this build")]
    UnknownBackend(String),
}

/// Immutable, ordered set of available backends.
///
/// Always contains [`BackendId::Null`], so [`first`](Self::first) never fails.
/// `Send + Sync`; sessions may share one registry.
#[derive(Debug, Clone)]
pub struct BackendRegistry {
    backends: Vec<BackendDescriptor>,
}

impl BackendRegistry {
    /// Backends enabled by cargo features, plus Null.
    pub fn compiled() -> Self {
        Self::from_backends(compiled_backends())
    }

    /// Registry over an explicit backend list.
    ///
    /// Input order is ignored: backends are sorted into priority order,
    /// duplicates are dropped and Null is added if missing.
    pub fn from_backends(ids: impl IntoIterator<Item = BackendId>) -> Self {
        Self::from_descriptors(ids.into_iter().map(BackendDescriptor::new))
    }

    /// Registry over prepared descriptors (e.g. with custom device listers).
    ///
    /// Same normalization as [`from_backends`](Self::from_backends); for
    /// duplicates the first descriptor wins.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = BackendDescriptor>) -> Self {
        let mut backends: Vec<BackendDescriptor> = Vec::new();
        for descriptor in descriptors {
            if !backends.iter().any(|d| d.id == descriptor.id) {
                backends.push(descriptor);
            }
        }
        if !backends.iter().any(|d| d.id == BackendId::Null) {
            backends.push(BackendDescriptor::new(BackendId::Null));
        }
        backends.sort_by_key(|d| d.id);
        Self { backends }
    }

    /// Available backends in priority order.
    pub fn backends(&self) -> &[BackendDescriptor] {
        &self.backends
    }

    /// Highest-priority backend; the fallback selection.
    pub fn first(&self) -> &BackendDescriptor {
        // Null is always registered
        &self.backends[0]
    }

    pub fn contains(&self, id: BackendId) -> bool {
        self.backends.iter().any(|d| d.id == id)
    }

    /// Descriptor of a registered backend.
    pub fn get(&self, id: BackendId) -> Result<&BackendDescriptor, RegistryError> {
        self.backends
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| RegistryError::UnknownBackend(id.id().to_string()))
    }

    /// Case-insensitive lookup by id or alias.
    pub fn find(&self, name: &str) -> Result<&BackendDescriptor, RegistryError> {
        BackendId::parse(name)
            .and_then(|id| self.get(id).ok())
            .ok_or_else(|| RegistryError::UnknownBackend(name.to_string()))
    }

    pub fn capabilities_of(&self, id: BackendId) -> Result<CapabilitySet, RegistryError> {
        self.get(id).map(|d| d.capabilities)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::compiled()
    }
}

fn compiled_backends() -> Vec<BackendId> {
    let mut backends = Vec::new();
    #[cfg(feature = "alsa")]
    backends.push(BackendId::Alsa);
    #[cfg(feature = "jack")]
    backends.push(BackendId::Jack);
    #[cfg(feature = "pulse")]
    backends.push(BackendId::Pulse);
    #[cfg(feature = "generic")]
    backends.push(BackendId::Qt);
    #[cfg(feature = "wav")]
    backends.push(BackendId::Wav);
    #[cfg(feature = "win32")]
    backends.push(BackendId::Win32);
    #[cfg(feature = "coreaudio")]
    backends.push(BackendId::CoreAudio);
    backends.push(BackendId::Null);
    backends
}
