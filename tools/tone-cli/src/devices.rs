//! Devices command - list the output devices of one backend

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tonecanvas_core::{
    BackendRegistry, DEFAULT_ENUMERATION_TIMEOUT, DeviceEnumerator, NativeEnumerator,
};

/// Arguments for the devices command
#[derive(Args)]
pub struct DevicesArgs {
    /// Backend id or alias (e.g. alsa, generic, coreaudio)
    pub backend: String,

    /// Give up on the device query after this many milliseconds
    #[arg(long, default_value_t = DEFAULT_ENUMERATION_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,
}

/// Execute the devices command
pub fn execute(args: DevicesArgs) -> Result<()> {
    let registry = BackendRegistry::compiled();
    let backend = registry
        .find(&args.backend)
        .with_context(|| format!("Cannot list devices for '{}'", args.backend))?;

    if !backend.capabilities.has_device_list {
        println!("{} has no device selection", backend.id);
        return Ok(());
    }

    let enumerator = NativeEnumerator::with_timeout(Duration::from_millis(args.timeout_ms));
    // Failures are logged by the enumerator and show up as an empty list
    let devices = enumerator.enumerate(backend);
    if devices.is_empty() {
        println!("No devices found for {}", backend.id);
    }
    for device in devices {
        println!("{device}");
    }
    Ok(())
}
