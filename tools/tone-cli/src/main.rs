//! Tone CLI - audio output configuration for Tonecanvas
//!
//! # Commands
//!
//! - `tone backends` - List the audio backends compiled into this build
//! - `tone devices <BACKEND>` - List a backend's output devices
//! - `tone show` - Show the persisted audio configuration
//! - `tone configure` - Edit and save the audio configuration
//!
//! # Usage
//!
//! ```bash
//! # Which backends can I pick?
//! tone backends
//!
//! # Switch to ALSA on the second card with a smaller buffer
//! tone configure --system alsa --device hw:1,0 --buffer-time 50000
//!
//! # Record to a WAV file, asking for the path
//! tone configure --system wav --choose-file
//!
//! # Preview a change without saving
//! tone configure --system jack --dry-run
//! ```
//!
//! Settings live in `audio.toml` in the platform configuration directory
//! unless `--config` points elsewhere. Logging follows `RUST_LOG` (default
//! `info`) and goes to stderr.

mod backends;
mod chooser;
mod configure;
mod devices;
mod show;

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tonecanvas_core::TomlFileStore;

/// Tone CLI - audio output configuration for Tonecanvas
#[derive(Parser)]
#[command(name = "tone")]
#[command(about = "Configure the audio output backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List audio backends available in this build
    Backends(backends::BackendsArgs),

    /// List output devices of a backend
    Devices(devices::DevicesArgs),

    /// Show the persisted audio configuration
    Show(show::ShowArgs),

    /// Edit the audio configuration and save it
    Configure(configure::ConfigureArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Backends(args) => backends::execute(args),
        Commands::Devices(args) => devices::execute(args),
        Commands::Show(args) => show::execute(args),
        Commands::Configure(args) => configure::execute(args),
    }
}

/// Open the settings file at `path`, or the default one.
pub(crate) fn open_store(path: Option<&Path>) -> Result<TomlFileStore> {
    match path {
        Some(path) => TomlFileStore::open(path)
            .with_context(|| format!("Failed to open settings file {}", path.display())),
        None => TomlFileStore::open_default().context("Failed to open default settings file"),
    }
}
