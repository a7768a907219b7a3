//! Settings persistence (`audio.*` keys)
//!
//! Moves a [`ConfigurationState`] to and from an opaque string key-value
//! store. Every key has a built-in default, so loading never fails and a
//! missing store is the same as a fresh install.

mod file_store;
mod memory;

use std::path::PathBuf;

use tonecanvas_shared::{BackendId, Field};
use tonecanvas_shared::constants::{
    DEFAULT_BUFFER_TIME_US, DEFAULT_PERIOD_TIME_US, DEFAULT_SAMPLE_RATE_HZ, KEY_BUFFER_TIME,
    KEY_DEVICE, KEY_FILE_PATH, KEY_PERIOD_TIME, KEY_SAMPLE_RATE, KEY_SYSTEM,
};
use tracing::warn;

use crate::audio::{BackendRegistry, ConfigurationState};

pub use file_store::{SETTINGS_FILE_NAME, TomlFileStore, config_dir, default_settings_path};
pub use memory::MemoryStore;

/// String key-value store holding persisted settings.
///
/// `set` may buffer; [`flush`](Self::flush) makes everything set so far
/// durable in one step.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String);

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Errors from durable settings stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no configuration directory available on this platform")]
    NoConfigDir,
    #[error("failed to access settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Read the persisted configuration.
///
/// Missing, empty, zero or unparsable numbers fall back to their defaults.
/// A missing backend, or one not available in `registry`, falls back to the
/// registry's first backend.
pub fn load(store: &dyn SettingsStore, registry: &BackendRegistry) -> ConfigurationState {
    let backend = store
        .get(KEY_SYSTEM)
        .filter(|name| !name.trim().is_empty())
        .and_then(|name| match registry.find(&name) {
            Ok(descriptor) => Some(descriptor.id),
            Err(e) => {
                warn!("Ignoring persisted audio system: {}", e);
                None
            }
        })
        .unwrap_or(registry.first().id);

    ConfigurationState {
        backend,
        device: Some(store.get(KEY_DEVICE).unwrap_or_default()),
        buffer_time_us: Some(read_u32(store, KEY_BUFFER_TIME, DEFAULT_BUFFER_TIME_US)),
        period_time_us: Some(read_u32(store, KEY_PERIOD_TIME, DEFAULT_PERIOD_TIME_US)),
        sample_rate_hz: read_u32(store, KEY_SAMPLE_RATE, DEFAULT_SAMPLE_RATE_HZ),
        file_path: Some(store.get(KEY_FILE_PATH).unwrap_or_default()),
    }
}

/// Write every field present in `state`, then flush.
pub fn save(store: &mut dyn SettingsStore, state: &ConfigurationState) -> Result<(), StoreError> {
    save_fields(store, state, &Field::ALL)
}

/// Write the backend id and the listed fields, then flush.
///
/// Fields that are `None` in `state` are skipped; keys not written keep
/// their previous value in the store. A stored system name that already
/// resolves to `state.backend` (e.g. `alsa`) is kept as written.
pub fn save_fields(
    store: &mut dyn SettingsStore,
    state: &ConfigurationState,
    fields: &[Field],
) -> Result<(), StoreError> {
    let stored = store.get(KEY_SYSTEM).and_then(|name| BackendId::parse(&name));
    if stored != Some(state.backend) {
        store.set(KEY_SYSTEM, state.backend.id().to_string());
    }
    for field in fields {
        if let Some(value) = field_value(state, *field) {
            store.set(field.key(), value);
        }
    }
    store.flush()
}

/// Persisted string form of a field.
pub fn field_value(state: &ConfigurationState, field: Field) -> Option<String> {
    match field {
        Field::Device => state.device.clone(),
        Field::BufferTime => state.buffer_time_us.map(|v| v.to_string()),
        Field::PeriodTime => state.period_time_us.map(|v| v.to_string()),
        Field::SampleRate => Some(state.sample_rate_hz.to_string()),
        Field::FilePath => state.file_path.clone(),
    }
}

fn read_u32(store: &dyn SettingsStore, key: &str, default: u32) -> u32 {
    store
        .get(key)
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| *value != 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> BackendRegistry {
        BackendRegistry::from_backends([BackendId::Alsa, BackendId::Jack, BackendId::Wav])
    }

    // =============================================================
    // Load
    // =============================================================

    #[test]
    fn test_load_fresh_install() {
        let state = load(&MemoryStore::new(), &registry());
        assert_eq!(state, ConfigurationState::new(BackendId::Alsa));
    }

    #[test]
    fn test_load_reads_every_key() {
        let store = MemoryStore::from_pairs([
            (KEY_SYSTEM, "jack"),
            (KEY_DEVICE, "hw:1,0"),
            (KEY_BUFFER_TIME, "50000"),
            (KEY_PERIOD_TIME, "10000"),
            (KEY_SAMPLE_RATE, "48000"),
            (KEY_FILE_PATH, "/tmp/out.wav"),
        ]);
        let state = load(&store, &registry());
        assert_eq!(state.backend, BackendId::Jack);
        assert_eq!(state.device.as_deref(), Some("hw:1,0"));
        assert_eq!(state.buffer_time_us, Some(50_000));
        assert_eq!(state.period_time_us, Some(10_000));
        assert_eq!(state.sample_rate_hz, 48_000);
        assert_eq!(state.file_path.as_deref(), Some("/tmp/out.wav"));
    }

    #[test]
    fn test_load_bad_numbers_fall_back() {
        let store = MemoryStore::from_pairs([
            (KEY_BUFFER_TIME, "0"),
            (KEY_PERIOD_TIME, "fast"),
            (KEY_SAMPLE_RATE, ""),
        ]);
        let state = load(&store, &registry());
        assert_eq!(state.buffer_time_us, Some(75_000));
        assert_eq!(state.period_time_us, Some(25_000));
        assert_eq!(state.sample_rate_hz, 44_100);
    }

    #[test]
    fn test_load_unavailable_backend_falls_back_to_first() {
        let store = MemoryStore::from_pairs([(KEY_SYSTEM, "Core")]);
        assert_eq!(load(&store, &registry()).backend, BackendId::Alsa);

        let store = MemoryStore::from_pairs([(KEY_SYSTEM, "nonsense")]);
        assert_eq!(load(&store, &registry()).backend, BackendId::Alsa);
    }

    // =============================================================
    // Save
    // =============================================================

    #[test]
    fn test_save_writes_all_keys() {
        let mut store = MemoryStore::new();
        save(&mut store, &ConfigurationState::new(BackendId::Wav)).unwrap();

        assert_eq!(store.get(KEY_SYSTEM).as_deref(), Some("WAV"));
        assert_eq!(store.get(KEY_DEVICE).as_deref(), Some(""));
        assert_eq!(store.get(KEY_BUFFER_TIME).as_deref(), Some("75000"));
        assert_eq!(store.get(KEY_PERIOD_TIME).as_deref(), Some("25000"));
        assert_eq!(store.get(KEY_SAMPLE_RATE).as_deref(), Some("44100"));
        assert_eq!(store.get(KEY_FILE_PATH).as_deref(), Some(""));
    }

    #[test]
    fn test_save_fields_leaves_other_keys() {
        let mut store = MemoryStore::from_pairs([(KEY_BUFFER_TIME, "12345")]);
        let mut state = ConfigurationState::new(BackendId::Alsa);
        state.sample_rate_hz = 48_000;

        save_fields(&mut store, &state, &[Field::SampleRate]).unwrap();

        assert_eq!(store.get(KEY_SYSTEM).as_deref(), Some("ALSA"));
        assert_eq!(store.get(KEY_SAMPLE_RATE).as_deref(), Some("48000"));
        assert_eq!(store.get(KEY_BUFFER_TIME).as_deref(), Some("12345"));
        assert_eq!(store.get(KEY_DEVICE), None);
    }

    #[test]
    fn test_save_skips_absent_values() {
        let mut store = MemoryStore::from_pairs([(KEY_DEVICE, "hw:2,0")]);
        let mut state = ConfigurationState::new(BackendId::Alsa);
        state.device = None;

        save(&mut store, &state).unwrap();
        assert_eq!(store.get(KEY_DEVICE).as_deref(), Some("hw:2,0"));
    }

    #[test]
    fn test_save_load_is_idempotent() {
        let mut store = MemoryStore::from_pairs([
            (KEY_SYSTEM, "ALSA"),
            (KEY_DEVICE, "hw:0,0"),
            (KEY_BUFFER_TIME, "60000"),
            (KEY_PERIOD_TIME, "20000"),
            (KEY_SAMPLE_RATE, "48000"),
            (KEY_FILE_PATH, "/music/take1.wav"),
        ]);
        let before = store.clone();

        let state = load(&store, &registry());
        save(&mut store, &state).unwrap();
        assert_eq!(store, before);
    }

    #[test]
    fn test_save_load_keeps_non_canonical_system() {
        let mut store = MemoryStore::from_pairs([
            (KEY_SYSTEM, "alsa"),
            (KEY_DEVICE, "hw:0,0"),
            (KEY_BUFFER_TIME, "60000"),
            (KEY_PERIOD_TIME, "20000"),
            (KEY_SAMPLE_RATE, "48000"),
            (KEY_FILE_PATH, ""),
        ]);
        let before = store.clone();

        let state = load(&store, &registry());
        assert_eq!(state.backend, BackendId::Alsa);
        save(&mut store, &state).unwrap();
        assert_eq!(store, before);
    }

    #[test]
    fn test_save_replaces_system_for_other_backend() {
        let mut store = MemoryStore::from_pairs([(KEY_SYSTEM, "alsa")]);
        save(&mut store, &ConfigurationState::new(BackendId::Jack)).unwrap();
        assert_eq!(store.get(KEY_SYSTEM).as_deref(), Some("JACK"));
    }

    #[test]
    fn test_save_load_normalizes_unavailable_system() {
        // Core is not in this registry; loading falls back to ALSA
        let mut store = MemoryStore::from_pairs([(KEY_SYSTEM, "Core")]);
        let state = load(&store, &registry());
        save(&mut store, &state).unwrap();
        assert_eq!(store.get(KEY_SYSTEM).as_deref(), Some("ALSA"));
    }

    #[test]
    fn test_save_load_reaches_fixed_point_from_empty() {
        let mut store = MemoryStore::new();
        let state = load(&store, &registry());
        save(&mut store, &state).unwrap();
        let after_first = store.clone();

        let state = load(&store, &registry());
        save(&mut store, &state).unwrap();
        assert_eq!(store, after_first);
    }
}
