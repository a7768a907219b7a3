//! Shared test utilities for integration and unit tests

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use hashbrown::HashMap;
use tonecanvas_shared::BackendId;

use crate::audio::{BackendDescriptor, BackendRegistry, ConfigForm, DeviceEnumerator, FileChooser};
use crate::settings::SettingsStore;

// ============================================================================
// Registries
// ============================================================================

/// Registry with every backend, regardless of enabled features.
pub fn full_registry() -> BackendRegistry {
    BackendRegistry::from_backends(BackendId::ALL)
}

/// Devices the fake reports for ALSA in most tests.
pub const ALSA_DEVICES: [&str; 3] = ["default", "hw:0,0", "hw:1,0"];

/// Devices the fake reports for the generic backend in most tests.
pub const QT_DEVICES: [&str; 2] = ["Built-in Audio", "USB Headset"];

// ============================================================================
// Fake Device Enumerator
// ============================================================================

#[derive(Default)]
struct FakeDevices {
    devices: HashMap<BackendId, Vec<String>>,
    calls: Vec<BackendId>,
}

/// Scripted device lists with a log of enumeration calls.
///
/// Clones share state, so a test can keep a handle after boxing one into a
/// form.
#[derive(Clone, Default)]
pub struct FakeEnumerator {
    inner: Rc<RefCell<FakeDevices>>,
}

impl FakeEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The usual ALSA and generic device lists.
    pub fn standard() -> Self {
        Self::new()
            .with_devices(BackendId::Alsa, &ALSA_DEVICES)
            .with_devices(BackendId::Qt, &QT_DEVICES)
    }

    pub fn with_devices(self, backend: BackendId, devices: &[&str]) -> Self {
        self.set_devices(backend, devices);
        self
    }

    pub fn set_devices(&self, backend: BackendId, devices: &[&str]) {
        self.inner
            .borrow_mut()
            .devices
            .insert(backend, devices.iter().map(|d| d.to_string()).collect());
    }

    /// Backends enumerated so far, in call order.
    pub fn calls(&self) -> Vec<BackendId> {
        self.inner.borrow().calls.clone()
    }

    pub fn boxed(&self) -> Box<dyn DeviceEnumerator> {
        Box::new(self.clone())
    }
}

impl DeviceEnumerator for FakeEnumerator {
    fn enumerate(&self, backend: &BackendDescriptor) -> Vec<String> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(backend.id);
        inner.devices.get(&backend.id).cloned().unwrap_or_default()
    }
}

// ============================================================================
// Scripted File Chooser
// ============================================================================

/// File chooser that returns a fixed selection and records dialog titles.
pub struct ScriptedChooser {
    selection: Option<PathBuf>,
    pub titles: Vec<String>,
}

impl ScriptedChooser {
    pub fn selecting(path: impl Into<PathBuf>) -> Self {
        Self {
            selection: Some(path.into()),
            titles: Vec::new(),
        }
    }

    /// A chooser the user cancels.
    pub fn cancelled() -> Self {
        Self {
            selection: None,
            titles: Vec::new(),
        }
    }
}

impl FileChooser for ScriptedChooser {
    fn choose_file(&mut self, title: &str) -> Option<PathBuf> {
        self.titles.push(title.to_string());
        self.selection.clone()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Open a form over every backend with the standard fake devices.
pub fn open_form(store: &dyn SettingsStore) -> (ConfigForm, FakeEnumerator) {
    let enumerator = FakeEnumerator::standard();
    let form = ConfigForm::open(full_registry(), enumerator.boxed(), store);
    (form, enumerator)
}
