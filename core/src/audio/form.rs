//! Audio configuration form
//!
//! One [`ConfigForm`] is one configuration session. It owns the editable
//! [`ConfigurationState`], decides from the selected backend's capabilities
//! which fields are shown and editable, and ends either in
//! [`commit`](ConfigForm::commit) or [`discard`](ConfigForm::discard).
//!
//! Opening the form is a transition into the persisted backend, through the
//! same path as a user switching backends.

use std::num::IntErrorKind;

use hashbrown::HashMap;
use serde::Serialize;
use tonecanvas_shared::constants::{
    DEFAULT_BUFFER_TIME_US, DEFAULT_PERIOD_TIME_US, MAX_TIME_US, MIN_TIME_US,
};
use tonecanvas_shared::{BackendId, CapabilitySet, Field, FieldState};
use tracing::{debug, info, warn};

use super::chooser::{FileChooser, WAV_FILE_DIALOG_TITLE};
use super::devices::DeviceEnumerator;
use super::registry::{BackendDescriptor, BackendRegistry, RegistryError};
use super::state::ConfigurationState;
use crate::settings::{self, SettingsStore, StoreError};

/// Title of the configuration form.
pub const FORM_TITLE: &str = "Audio Configuration";

/// Rejected edits. The form state is unchanged after any of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("{field} cannot be edited with the {backend} backend")]
    FieldNotEditable { field: Field, backend: BackendId },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: Field,
        value: String,
        min: u32,
        max: u32,
    },
    #[error("{field} expects a whole number, got '{input}'")]
    InvalidNumber { field: Field, input: String },
    #[error("device '{device}' is not offered by the {backend} backend")]
    DeviceNotListed { device: String, backend: BackendId },
}

/// Snapshot of the form for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub backend: BackendId,
    pub display_name: &'static str,
    /// Devices offered for selection; empty when the device field is hidden
    pub devices: Vec<String>,
    /// Every field in form order, hidden ones included
    pub fields: Vec<FieldView>,
}

impl FormView {
    pub fn field(&self, field: Field) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.field == field)
    }

    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldView> {
        self.fields.iter().filter(|f| f.state.is_visible())
    }
}

/// One field of a [`FormView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub field: Field,
    pub state: FieldState,
    pub label: &'static str,
    /// Current value; `None` when hidden or unset
    pub value: Option<String>,
    /// `Default: ...` hint, only for editable numeric fields
    pub default_hint: Option<String>,
}

/// Editing session over the audio configuration.
pub struct ConfigForm {
    registry: BackendRegistry,
    enumerator: Box<dyn DeviceEnumerator>,
    current: BackendDescriptor,
    /// Raw values, including stale ones of fields the backend hides
    values: ConfigurationState,
    devices: Vec<String>,
    /// Device choices made in this session, per backend (`None` = cleared)
    remembered_devices: HashMap<BackendId, Option<String>>,
    /// Device persisted before the session; tried where nothing was chosen yet
    persisted_device: Option<String>,
}

impl ConfigForm {
    /// Open a session seeded from persisted settings.
    pub fn open(
        registry: BackendRegistry,
        enumerator: Box<dyn DeviceEnumerator>,
        store: &dyn SettingsStore,
    ) -> Self {
        let state = settings::load(store, &registry);
        Self::with_state(registry, enumerator, state)
    }

    /// Open a session seeded from an explicit state.
    ///
    /// A backend missing from `registry` is replaced by the registry's first
    /// backend.
    pub fn with_state(
        registry: BackendRegistry,
        enumerator: Box<dyn DeviceEnumerator>,
        state: ConfigurationState,
    ) -> Self {
        let current = match registry.get(state.backend) {
            Ok(descriptor) => *descriptor,
            Err(e) => {
                warn!("{}, falling back to {}", e, registry.first().id);
                *registry.first()
            }
        };
        let persisted_device = state.device.clone().filter(|d| !d.is_empty());

        let mut form = Self {
            registry,
            enumerator,
            current,
            values: state,
            devices: Vec::new(),
            remembered_devices: HashMap::new(),
            persisted_device,
        };
        form.enter_backend(current);
        form
    }

    // === Backend selection ===

    /// Switch to another registered backend.
    ///
    /// Re-enumerates devices, applies defaults and restores the device
    /// remembered for that backend. Selecting the current backend is a no-op.
    pub fn select_backend(&mut self, id: BackendId) -> Result<(), FormError> {
        let descriptor = *self.registry.get(id)?;
        if descriptor.id != self.current.id {
            self.enter_backend(descriptor);
        }
        Ok(())
    }

    /// [`select_backend`](Self::select_backend) by case-insensitive name.
    pub fn select_backend_by_name(&mut self, name: &str) -> Result<BackendId, FormError> {
        let id = self.registry.find(name)?.id;
        self.select_backend(id)?;
        Ok(id)
    }

    fn enter_backend(&mut self, descriptor: BackendDescriptor) {
        let caps = descriptor.capabilities;
        self.current = descriptor;
        self.values.backend = descriptor.id;

        self.devices = if caps.has_device_list {
            self.enumerator.enumerate(&descriptor)
        } else {
            Vec::new()
        };

        self.apply_defaults(caps);
        self.values.device = self.restore_device();

        debug!(
            backend = %descriptor.id,
            devices = self.devices.len(),
            device = ?self.values.device,
            "Entered audio backend"
        );
    }

    fn apply_defaults(&mut self, caps: CapabilitySet) {
        if caps.has_buffer_time && self.values.buffer_time_us.is_none() {
            self.values.buffer_time_us = Some(DEFAULT_BUFFER_TIME_US);
        }
        if caps.has_period_time && self.values.period_time_us.is_none() {
            self.values.period_time_us = Some(DEFAULT_PERIOD_TIME_US);
        }
        if caps.has_file_path && self.values.file_path.is_none() {
            self.values.file_path = Some(String::new());
        }
        // Fixed sample rates are applied on read, see `effective_sample_rate`
    }

    /// Device to preselect for the current backend, if it is still listed.
    fn restore_device(&self) -> Option<String> {
        if !self.current.capabilities.has_device_list {
            return None;
        }
        let wanted = match self.remembered_devices.get(&self.current.id) {
            Some(choice) => choice.clone(),
            None => self.persisted_device.clone(),
        }?;
        if self.devices.contains(&wanted) {
            Some(wanted)
        } else {
            debug!(device = %wanted, "Remembered device not listed, leaving unset");
            None
        }
    }

    /// Query the current backend's devices again.
    ///
    /// The selection is kept if the device is still listed.
    pub fn refresh_devices(&mut self) {
        if !self.current.capabilities.has_device_list {
            return;
        }
        self.devices = self.enumerator.enumerate(&self.current);
        let still_listed = match &self.values.device {
            Some(device) => self.devices.contains(device),
            None => true,
        };
        if !still_listed {
            debug!(device = ?self.values.device, "Selected device disappeared");
            self.values.device = None;
        }
    }

    // === Field edits ===

    fn ensure_editable(&self, field: Field) -> Result<(), FormError> {
        if self.field_state(field).is_editable() {
            Ok(())
        } else {
            Err(FormError::FieldNotEditable {
                field,
                backend: self.current.id,
            })
        }
    }

    /// Select a listed device, or clear the selection with `None`.
    pub fn select_device(&mut self, device: Option<&str>) -> Result<(), FormError> {
        self.ensure_editable(Field::Device)?;
        if let Some(device) = device {
            if !self.devices.iter().any(|d| d == device) {
                return Err(FormError::DeviceNotListed {
                    device: device.to_string(),
                    backend: self.current.id,
                });
            }
        }

        let device = device.map(str::to_string);
        self.remembered_devices
            .insert(self.current.id, device.clone());
        self.values.device = device;
        Ok(())
    }

    /// Set the buffer time from user input. Accepts 1..=1000000 µs.
    pub fn set_buffer_time(&mut self, input: &str) -> Result<u32, FormError> {
        self.ensure_editable(Field::BufferTime)?;
        let value = parse_time(Field::BufferTime, input)?;
        self.values.buffer_time_us = Some(value);
        Ok(value)
    }

    /// Set the period time from user input. Accepts 1..=1000000 µs.
    pub fn set_period_time(&mut self, input: &str) -> Result<u32, FormError> {
        self.ensure_editable(Field::PeriodTime)?;
        let value = parse_time(Field::PeriodTime, input)?;
        self.values.period_time_us = Some(value);
        Ok(value)
    }

    /// Set the sample rate from user input.
    ///
    /// Any whole number is accepted; the backend rejects unsupported rates
    /// when it opens the device.
    pub fn set_sample_rate(&mut self, input: &str) -> Result<u32, FormError> {
        self.ensure_editable(Field::SampleRate)?;
        let value = input
            .trim()
            .parse::<u32>()
            .map_err(|_| FormError::InvalidNumber {
                field: Field::SampleRate,
                input: input.to_string(),
            })?;
        self.values.sample_rate_hz = value;
        Ok(value)
    }

    pub fn set_file_path(&mut self, path: impl Into<String>) -> Result<(), FormError> {
        self.ensure_editable(Field::FilePath)?;
        self.values.file_path = Some(path.into());
        Ok(())
    }

    /// Ask `chooser` for the output file.
    ///
    /// Returns whether a path was selected. Selecting nothing leaves the
    /// current path untouched.
    pub fn choose_file_path(&mut self, chooser: &mut dyn FileChooser) -> Result<bool, FormError> {
        self.ensure_editable(Field::FilePath)?;
        match chooser.choose_file(WAV_FILE_DIALOG_TITLE) {
            Some(path) => {
                self.values.file_path = Some(path.to_string_lossy().into_owned());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // === Queries ===

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn backend(&self) -> BackendId {
        self.current.id
    }

    pub fn descriptor(&self) -> &BackendDescriptor {
        &self.current
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.current.capabilities
    }

    pub fn field_state(&self, field: Field) -> FieldState {
        self.current.capabilities.field_state(field)
    }

    /// Devices offered by the current backend.
    pub fn devices(&self) -> &[String] {
        &self.devices
    }

    pub fn selected_device(&self) -> Option<&str> {
        self.active(Field::Device)
            .and(self.values.device.as_deref())
    }

    pub fn buffer_time_us(&self) -> Option<u32> {
        self.active(Field::BufferTime)
            .and(self.values.buffer_time_us)
    }

    pub fn period_time_us(&self) -> Option<u32> {
        self.active(Field::PeriodTime)
            .and(self.values.period_time_us)
    }

    /// Sample rate, with a backend's fixed rate taking precedence.
    pub fn sample_rate_hz(&self) -> Option<u32> {
        self.active(Field::SampleRate)
            .map(|_| self.values.effective_sample_rate())
    }

    pub fn file_path(&self) -> Option<&str> {
        self.active(Field::FilePath)
            .and(self.values.file_path.as_deref())
    }

    fn active(&self, field: Field) -> Option<()> {
        self.field_state(field).is_visible().then_some(())
    }

    /// The configuration as it would be committed.
    ///
    /// Hidden fields carry their stale values; only the visible ones are
    /// written by [`commit`](Self::commit). A device the user cleared is
    /// `Some("")`; a device that is merely not listed stays `None`.
    pub fn state(&self) -> ConfigurationState {
        let mut state = ConfigurationState {
            sample_rate_hz: self.values.effective_sample_rate(),
            ..self.values.clone()
        };
        if state.device.is_none() && self.device_cleared() {
            state.device = Some(String::new());
        }
        state
    }

    fn device_cleared(&self) -> bool {
        matches!(self.remembered_devices.get(&self.current.id), Some(None))
    }

    pub fn view(&self) -> FormView {
        let fields = Field::ALL
            .into_iter()
            .map(|field| {
                let state = self.field_state(field);
                FieldView {
                    field,
                    state,
                    label: field.label(),
                    value: self.field_value(field),
                    default_hint: if state.is_editable() {
                        field.default_hint()
                    } else {
                        None
                    },
                }
            })
            .collect();

        FormView {
            backend: self.current.id,
            display_name: self.current.display_name,
            devices: self.devices.clone(),
            fields,
        }
    }

    fn field_value(&self, field: Field) -> Option<String> {
        match field {
            Field::Device => self.selected_device().map(str::to_string),
            Field::BufferTime => self.buffer_time_us().map(|v| v.to_string()),
            Field::PeriodTime => self.period_time_us().map(|v| v.to_string()),
            Field::SampleRate => self.sample_rate_hz().map(|v| v.to_string()),
            Field::FilePath => self.file_path().map(str::to_string),
        }
    }

    // === Terminal actions ===

    /// Persist the backend and its visible fields.
    ///
    /// Keys of fields the backend hides keep their stored values, so
    /// settings made for another backend survive. A device cleared by the
    /// user is written as empty; a remembered device that is no longer
    /// listed leaves the stored key alone. On error the form is unchanged
    /// and may be committed again.
    pub fn commit(&self, store: &mut dyn SettingsStore) -> Result<(), StoreError> {
        let state = self.state();
        let fields = self.current.capabilities.visible_fields();
        settings::save_fields(store, &state, &fields)?;
        info!(backend = %state.backend, "Saved audio configuration");
        Ok(())
    }

    /// End the session without writing anything.
    pub fn discard(self) {
        debug!(backend = %self.current.id, "Discarded audio configuration changes");
    }
}

fn parse_time(field: Field, input: &str) -> Result<u32, FormError> {
    let trimmed = input.trim();
    let out_of_range = || FormError::OutOfRange {
        field,
        value: trimmed.to_string(),
        min: MIN_TIME_US,
        max: MAX_TIME_US,
    };
    let value = trimmed.parse::<i64>().map_err(|e| match e.kind() {
        // Whole numbers too long for any integer type are still numbers
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => out_of_range(),
        _ => FormError::InvalidNumber {
            field,
            input: input.to_string(),
        },
    })?;
    if value < i64::from(MIN_TIME_US) || value > i64::from(MAX_TIME_US) {
        return Err(out_of_range());
    }
    // In range, fits u32
    Ok(value as u32)
}
