//! Centralized constants for audio output configuration.
//!
//! Single source of truth for settings keys, default values and input
//! ranges used by the form controller, the persistence adapter and the
//! front ends.

// === Settings keys ===

/// Selected backend id (`ALSA`, `JACK`, ...).
pub const KEY_SYSTEM: &str = "audio.system";

/// Backend-local device identifier.
pub const KEY_DEVICE: &str = "audio.device";

/// Buffer time in microseconds.
pub const KEY_BUFFER_TIME: &str = "audio.buffer_time";

/// Period time in microseconds.
pub const KEY_PERIOD_TIME: &str = "audio.period_time";

/// Sample rate in Hz.
pub const KEY_SAMPLE_RATE: &str = "audio.sample_rate";

/// Output path of the WAV writer.
pub const KEY_FILE_PATH: &str = "audio.file_path";

/// Every key written by a full save, in write order.
pub const ALL_KEYS: [&str; 6] = [
    KEY_SYSTEM,
    KEY_DEVICE,
    KEY_BUFFER_TIME,
    KEY_PERIOD_TIME,
    KEY_SAMPLE_RATE,
    KEY_FILE_PATH,
];

// === Defaults ===

/// Default buffer time (75 ms)
pub const DEFAULT_BUFFER_TIME_US: u32 = 75_000;

/// Default period time (25 ms)
pub const DEFAULT_PERIOD_TIME_US: u32 = 25_000;

/// Default output sample rate
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 44_100;

/// The WAV writer always records at this rate.
pub const WAV_SAMPLE_RATE_HZ: u32 = 44_100;

// === Input ranges ===

/// Smallest accepted buffer/period time.
pub const MIN_TIME_US: u32 = 1;

/// Largest accepted buffer/period time (one second).
pub const MAX_TIME_US: u32 = 1_000_000;
