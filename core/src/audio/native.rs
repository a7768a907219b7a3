//! Native device listing routines.
//!
//! Each routine is functional only when its cargo feature is enabled and the
//! target platform provides the audio API. Otherwise it reports
//! [`EnumerationError::Unavailable`], which the enumerator turns into an
//! empty device list.
//!
//! All listing goes through cpal hosts:
//! - ALSA: `HostId::Alsa` (Linux and BSDs)
//! - Qt/generic: the platform default host
//! - Win32: `HostId::Wasapi` (Windows)
//! - CoreAudio: `HostId::CoreAudio` (macOS)

use tonecanvas_shared::BackendId;

use super::devices::EnumerationError;
use super::registry::ListDevicesFn;

/// Listing routine for a backend with a device list, `None` otherwise.
pub(crate) fn lister_for(id: BackendId) -> Option<ListDevicesFn> {
    match id {
        BackendId::Alsa => Some(alsa_devices),
        BackendId::Qt => Some(generic_devices),
        BackendId::Win32 => Some(win32_devices),
        BackendId::CoreAudio => Some(coreaudio_devices),
        BackendId::Jack | BackendId::Pulse | BackendId::Wav | BackendId::Null => None,
    }
}

fn alsa_devices() -> Result<Vec<String>, EnumerationError> {
    #[cfg(all(
        feature = "alsa",
        any(
            target_os = "linux",
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "netbsd"
        )
    ))]
    {
        let host = cpal::host_from_id(cpal::HostId::Alsa)
            .map_err(|e| EnumerationError::Native(e.to_string()))?;
        output_device_names(&host)
    }

    #[cfg(not(all(
        feature = "alsa",
        any(
            target_os = "linux",
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "netbsd"
        )
    )))]
    {
        Err(EnumerationError::Unavailable(BackendId::Alsa))
    }
}

fn generic_devices() -> Result<Vec<String>, EnumerationError> {
    #[cfg(feature = "generic")]
    {
        output_device_names(&cpal::default_host())
    }

    #[cfg(not(feature = "generic"))]
    {
        Err(EnumerationError::Unavailable(BackendId::Qt))
    }
}

fn win32_devices() -> Result<Vec<String>, EnumerationError> {
    #[cfg(all(feature = "win32", target_os = "windows"))]
    {
        let host = cpal::host_from_id(cpal::HostId::Wasapi)
            .map_err(|e| EnumerationError::Native(e.to_string()))?;
        output_device_names(&host)
    }

    #[cfg(not(all(feature = "win32", target_os = "windows")))]
    {
        Err(EnumerationError::Unavailable(BackendId::Win32))
    }
}

fn coreaudio_devices() -> Result<Vec<String>, EnumerationError> {
    #[cfg(all(feature = "coreaudio", target_os = "macos"))]
    {
        let host = cpal::host_from_id(cpal::HostId::CoreAudio)
            .map_err(|e| EnumerationError::Native(e.to_string()))?;
        output_device_names(&host)
    }

    #[cfg(not(all(feature = "coreaudio", target_os = "macos")))]
    {
        Err(EnumerationError::Unavailable(BackendId::CoreAudio))
    }
}

/// Names of all output devices of a cpal host.
///
/// Devices whose name cannot be read are skipped.
#[cfg(any(
    all(
        feature = "alsa",
        any(
            target_os = "linux",
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "netbsd"
        )
    ),
    feature = "generic",
    all(feature = "win32", target_os = "windows"),
    all(feature = "coreaudio", target_os = "macos"),
))]
fn output_device_names(host: &cpal::Host) -> Result<Vec<String>, EnumerationError> {
    use cpal::traits::{DeviceTrait, HostTrait};

    let devices = host
        .output_devices()
        .map_err(|e| EnumerationError::Native(e.to_string()))?;

    Ok(devices
        .filter_map(|device| match device.name() {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::debug!("Skipping output device without a name: {}", e);
                None
            }
        })
        .collect())
}
