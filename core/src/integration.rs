//! Integration tests for the audio configuration flow
//!
//! Full sessions: load from a store, edit through the form, commit, and
//! reopen. Runs against both the in-memory store and the TOML file store,
//! with the native enumerator driving scripted device listers.

use std::time::Duration;

use tonecanvas_shared::BackendId;
use tonecanvas_shared::constants::{
    KEY_BUFFER_TIME, KEY_DEVICE, KEY_FILE_PATH, KEY_PERIOD_TIME, KEY_SAMPLE_RATE, KEY_SYSTEM,
};

use crate::audio::{
    BackendDescriptor, BackendRegistry, ConfigForm, ConfigurationState, EnumerationError,
    NativeEnumerator,
};
use crate::settings::{self, MemoryStore, SettingsStore, TomlFileStore};
use crate::test_utils::{ScriptedChooser, full_registry, open_form};

fn scripted_alsa() -> Result<Vec<String>, EnumerationError> {
    Ok(vec![
        "default".to_string(),
        "hw:0,0".to_string(),
        "hw:0,0".to_string(),
        "hw:1,0".to_string(),
    ])
}

fn broken_qt() -> Result<Vec<String>, EnumerationError> {
    Err(EnumerationError::Native("device query failed".to_string()))
}

/// Registry whose device backends use scripted listers instead of cpal.
fn scripted_registry() -> BackendRegistry {
    BackendRegistry::from_descriptors([
        BackendDescriptor::new(BackendId::Alsa).with_device_lister(scripted_alsa),
        BackendDescriptor::new(BackendId::Jack),
        BackendDescriptor::new(BackendId::Qt).with_device_lister(broken_qt),
        BackendDescriptor::new(BackendId::Wav),
    ])
}

fn native_form(store: &dyn SettingsStore) -> ConfigForm {
    let enumerator = NativeEnumerator::with_timeout(Duration::from_secs(2));
    ConfigForm::open(scripted_registry(), Box::new(enumerator), store)
}

// ============================================================================
// Fresh Install
// ============================================================================

#[test]
fn test_fresh_install_commit() {
    let mut store = MemoryStore::new();
    let form = native_form(&store);
    form.commit(&mut store).unwrap();

    // Nothing was selected, so no device key is written
    let expected = MemoryStore::from_pairs([
        (KEY_SYSTEM, "ALSA"),
        (KEY_BUFFER_TIME, "75000"),
        (KEY_PERIOD_TIME, "25000"),
        (KEY_SAMPLE_RATE, "44100"),
    ]);
    assert_eq!(store, expected);

    let reloaded = settings::load(&store, &scripted_registry());
    assert_eq!(reloaded, ConfigurationState::new(BackendId::Alsa));
}

#[test]
fn test_fresh_install_load_save_fixed_point() {
    let registry = full_registry();
    let mut store = MemoryStore::new();

    let state = settings::load(&store, &registry);
    settings::save(&mut store, &state).unwrap();
    let once = store.clone();
    let state = settings::load(&store, &registry);
    settings::save(&mut store, &state).unwrap();
    assert_eq!(store, once);

    assert_eq!(
        settings::load(&store, &registry),
        ConfigurationState::new(BackendId::Alsa)
    );
}

// ============================================================================
// Native Enumeration
// ============================================================================

#[test]
fn test_native_enumeration_dedups_and_restores() {
    let store = MemoryStore::from_pairs([(KEY_SYSTEM, "alsa"), (KEY_DEVICE, "hw:1,0")]);
    let form = native_form(&store);
    assert_eq!(form.devices(), ["default", "hw:0,0", "hw:1,0"]);
    assert_eq!(form.selected_device(), Some("hw:1,0"));
}

#[test]
fn test_failed_enumeration_is_empty_list() {
    let store = MemoryStore::from_pairs([(KEY_SYSTEM, "Qt"), (KEY_DEVICE, "USB Headset")]);
    let mut form = native_form(&store);
    assert_eq!(form.backend(), BackendId::Qt);
    assert!(form.devices().is_empty());
    assert_eq!(form.selected_device(), None);

    // Other fields stay usable
    assert_eq!(form.set_buffer_time("30000"), Ok(30_000));
}

// ============================================================================
// Commit and Reopen
// ============================================================================

#[test]
fn test_alsa_session_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audio.toml");

    let mut store = TomlFileStore::open(&path).unwrap();
    let mut form = native_form(&store);
    form.select_device(Some("hw:0,0")).unwrap();
    form.set_buffer_time("40000").unwrap();
    form.set_period_time("10000").unwrap();
    form.set_sample_rate("48000").unwrap();
    let committed = form.view();
    form.commit(&mut store).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[audio]"), "{text}");
    assert!(text.contains("system = \"ALSA\""), "{text}");

    let reopened = native_form(&TomlFileStore::open(&path).unwrap());
    assert_eq!(reopened.view(), committed);
}

#[test]
fn test_wav_session_with_cancelled_chooser() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audio.toml");

    let mut store = TomlFileStore::open(&path).unwrap();
    store.set(KEY_FILE_PATH, "/rec/session.wav".to_string());
    store.set(KEY_SAMPLE_RATE, "96000".to_string());
    store.flush().unwrap();

    let mut form = native_form(&store);
    form.select_backend(BackendId::Wav).unwrap();
    assert_eq!(form.sample_rate_hz(), Some(44_100));
    assert_eq!(
        form.choose_file_path(&mut ScriptedChooser::cancelled()),
        Ok(false)
    );
    form.commit(&mut store).unwrap();

    let store = TomlFileStore::open(&path).unwrap();
    assert_eq!(store.get(KEY_SYSTEM).as_deref(), Some("WAV"));
    assert_eq!(store.get(KEY_FILE_PATH).as_deref(), Some("/rec/session.wav"));
    assert_eq!(store.get(KEY_SAMPLE_RATE).as_deref(), Some("44100"));
}

#[test]
fn test_jack_commit_keeps_alsa_settings() {
    let mut store = MemoryStore::from_pairs([
        (KEY_SYSTEM, "ALSA"),
        (KEY_DEVICE, "hw:1,0"),
        (KEY_BUFFER_TIME, "50000"),
        (KEY_PERIOD_TIME, "10000"),
        (KEY_SAMPLE_RATE, "48000"),
    ]);

    let (mut form, _) = open_form(&store);
    form.select_backend(BackendId::Jack).unwrap();
    form.commit(&mut store).unwrap();

    // Switching back in a later session finds the ALSA values again
    let (mut form, _) = open_form(&store);
    assert_eq!(form.backend(), BackendId::Jack);
    form.select_backend(BackendId::Alsa).unwrap();
    assert_eq!(form.selected_device(), Some("hw:1,0"));
    assert_eq!(form.buffer_time_us(), Some(50_000));
    assert_eq!(form.period_time_us(), Some(10_000));
    assert_eq!(form.sample_rate_hz(), Some(48_000));
}

#[test]
fn test_rejected_edit_does_not_reach_store() {
    let mut store = MemoryStore::from_pairs([(KEY_SYSTEM, "ALSA"), (KEY_BUFFER_TIME, "50000")]);
    let (mut form, _) = open_form(&store);

    assert!(form.set_buffer_time("0").is_err());
    form.commit(&mut store).unwrap();
    assert_eq!(store.get(KEY_BUFFER_TIME).as_deref(), Some("50000"));
}

#[test]
fn test_unavailable_persisted_backend() {
    let store = MemoryStore::from_pairs([(KEY_SYSTEM, "Core"), (KEY_DEVICE, "Speakers")]);
    let form = native_form(&store);
    assert_eq!(form.backend(), BackendId::Alsa);
    assert_eq!(form.selected_device(), None);
}
