//! Audio backends and what each of them lets the user configure.
//!
//! The mapping from [`BackendId`] to [`CapabilitySet`] is a total `match`
//! over a closed enum. Adding a backend without deciding its capabilities
//! fails to compile instead of falling through to a default.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::constants::{
    DEFAULT_BUFFER_TIME_US, DEFAULT_PERIOD_TIME_US, DEFAULT_SAMPLE_RATE_HZ, KEY_BUFFER_TIME,
    KEY_DEVICE, KEY_FILE_PATH, KEY_PERIOD_TIME, KEY_SAMPLE_RATE,
};

/// Native audio output transport.
///
/// Declaration order is the priority order backends are offered in, so the
/// derived `Ord` sorts a backend list the way the registry presents it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BackendId {
    Alsa,
    Jack,
    Pulse,
    /// Generic multimedia backend (Qt Multimedia in the desktop build)
    Qt,
    /// Raw WAV file writer
    Wav,
    /// Win32 waveform output
    Win32,
    CoreAudio,
    /// Discards all audio. Always compiled in.
    Null,
}

impl BackendId {
    /// Every backend, in priority order.
    pub const ALL: [BackendId; 8] = [
        BackendId::Alsa,
        BackendId::Jack,
        BackendId::Pulse,
        BackendId::Qt,
        BackendId::Wav,
        BackendId::Win32,
        BackendId::CoreAudio,
        BackendId::Null,
    ];

    /// Canonical id, as persisted under `audio.system`.
    pub const fn id(self) -> &'static str {
        match self {
            BackendId::Alsa => "ALSA",
            BackendId::Jack => "JACK",
            BackendId::Pulse => "Pulse",
            BackendId::Qt => "Qt",
            BackendId::Wav => "WAV",
            BackendId::Win32 => "Win32",
            BackendId::CoreAudio => "Core",
            BackendId::Null => "Null",
        }
    }

    /// Human-readable name for menus.
    pub const fn display_name(self) -> &'static str {
        match self {
            BackendId::Alsa => "ALSA",
            BackendId::Jack => "JACK",
            BackendId::Pulse => "PulseAudio",
            BackendId::Qt => "Qt Multimedia",
            BackendId::Wav => "WAV file",
            BackendId::Win32 => "Win32 waveform",
            BackendId::CoreAudio => "CoreAudio",
            BackendId::Null => "Null",
        }
    }

    /// Configuration dimensions this backend understands.
    pub const fn capabilities(self) -> CapabilitySet {
        match self {
            BackendId::Alsa => CapabilitySet {
                has_device_list: true,
                has_buffer_time: true,
                has_period_time: true,
                has_sample_rate: true,
                sample_rate_editable: true,
                has_file_path: false,
            },
            BackendId::Qt => CapabilitySet {
                has_device_list: true,
                has_buffer_time: true,
                has_period_time: false,
                has_sample_rate: true,
                sample_rate_editable: true,
                has_file_path: false,
            },
            BackendId::Win32 | BackendId::CoreAudio => CapabilitySet {
                has_device_list: true,
                ..CapabilitySet::NONE
            },
            BackendId::Wav => CapabilitySet {
                has_sample_rate: true,
                sample_rate_editable: false,
                has_file_path: true,
                ..CapabilitySet::NONE
            },
            BackendId::Jack | BackendId::Pulse | BackendId::Null => CapabilitySet::NONE,
        }
    }

    /// Sample rate the backend is pinned to, if it does not allow editing.
    pub const fn fixed_sample_rate(self) -> Option<u32> {
        match self {
            BackendId::Wav => Some(crate::constants::WAV_SAMPLE_RATE_HZ),
            BackendId::Alsa
            | BackendId::Jack
            | BackendId::Pulse
            | BackendId::Qt
            | BackendId::Win32
            | BackendId::CoreAudio
            | BackendId::Null => None,
        }
    }

    /// Case-insensitive lookup by canonical id or accepted alias.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|backend| backend.id().eq_ignore_ascii_case(name))
            .or_else(|| match name.to_ascii_lowercase().as_str() {
                "pulseaudio" => Some(BackendId::Pulse),
                "generic" => Some(BackendId::Qt),
                "coreaudio" => Some(BackendId::CoreAudio),
                _ => None,
            })
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for BackendId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Returned when a string names no known backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown audio backend '{0}'")]
pub struct ParseBackendError(pub String);

impl FromStr for BackendId {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseBackendError(s.to_string()))
    }
}

/// Independent flags describing which configuration dimensions a backend
/// exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CapabilitySet {
    pub has_device_list: bool,
    pub has_buffer_time: bool,
    pub has_period_time: bool,
    pub has_sample_rate: bool,
    /// Only meaningful together with `has_sample_rate`
    pub sample_rate_editable: bool,
    pub has_file_path: bool,
}

impl CapabilitySet {
    /// No configurable dimension at all.
    pub const NONE: Self = Self {
        has_device_list: false,
        has_buffer_time: false,
        has_period_time: false,
        has_sample_rate: false,
        sample_rate_editable: false,
        has_file_path: false,
    };

    /// How `field` is presented for a backend with these capabilities.
    pub const fn field_state(self, field: Field) -> FieldState {
        let (visible, editable) = match field {
            Field::Device => (self.has_device_list, true),
            Field::BufferTime => (self.has_buffer_time, true),
            Field::PeriodTime => (self.has_period_time, true),
            Field::SampleRate => (self.has_sample_rate, self.sample_rate_editable),
            Field::FilePath => (self.has_file_path, true),
        };
        match (visible, editable) {
            (false, _) => FieldState::Hidden,
            (true, false) => FieldState::ReadOnly,
            (true, true) => FieldState::Editable,
        }
    }

    /// Fields that are shown (editable or read-only), in form order.
    pub fn visible_fields(self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.field_state(*field).is_visible())
            .collect()
    }
}

/// A configurable dimension of the audio output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Device,
    BufferTime,
    PeriodTime,
    SampleRate,
    FilePath,
}

impl Field {
    /// All fields, in form order.
    pub const ALL: [Field; 5] = [
        Field::Device,
        Field::BufferTime,
        Field::PeriodTime,
        Field::SampleRate,
        Field::FilePath,
    ];

    /// Settings key the field persists under.
    pub const fn key(self) -> &'static str {
        match self {
            Field::Device => KEY_DEVICE,
            Field::BufferTime => KEY_BUFFER_TIME,
            Field::PeriodTime => KEY_PERIOD_TIME,
            Field::SampleRate => KEY_SAMPLE_RATE,
            Field::FilePath => KEY_FILE_PATH,
        }
    }

    /// Form label.
    pub const fn label(self) -> &'static str {
        match self {
            Field::Device => "Audio device",
            Field::BufferTime => "Buffer time (µs)",
            Field::PeriodTime => "Period time (µs)",
            Field::SampleRate => "Sample rate (Hz)",
            Field::FilePath => "File path",
        }
    }

    /// Built-in default for numeric fields.
    pub const fn default_value(self) -> Option<u32> {
        match self {
            Field::BufferTime => Some(DEFAULT_BUFFER_TIME_US),
            Field::PeriodTime => Some(DEFAULT_PERIOD_TIME_US),
            Field::SampleRate => Some(DEFAULT_SAMPLE_RATE_HZ),
            Field::Device | Field::FilePath => None,
        }
    }

    /// Hint shown next to an editable numeric field, e.g. `Default: 75000`.
    pub fn default_hint(self) -> Option<String> {
        self.default_value().map(|value| format!("Default: {value}"))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Device => "device",
            Field::BufferTime => "buffer time",
            Field::PeriodTime => "period time",
            Field::SampleRate => "sample rate",
            Field::FilePath => "file path",
        };
        f.write_str(name)
    }
}

/// Presentation of a field for the selected backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    Hidden,
    /// Shown with a fixed value
    ReadOnly,
    Editable,
}

impl FieldState {
    pub const fn is_visible(self) -> bool {
        !matches!(self, FieldState::Hidden)
    }

    pub const fn is_editable(self) -> bool {
        matches!(self, FieldState::Editable)
    }
}
