//! Configure command - edit the audio configuration and save it
//!
//! Opens one form session, applies the requested edits in order (backend
//! first, so the other fields are checked against its capabilities) and
//! commits. A rejected edit ends the session without writing anything.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tonecanvas_core::{
    BackendRegistry, ConfigForm, DeviceEnumerator, FileChooser, FormView, NativeEnumerator,
    SettingsStore,
};
use tracing::info;

use crate::chooser::PromptChooser;
use crate::show::print_view;

/// Arguments for the configure command
#[derive(Args, Default)]
pub struct ConfigureArgs {
    /// Settings file (defaults to audio.toml in the config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Audio backend id or alias
    #[arg(long)]
    pub system: Option<String>,

    /// Output device; an empty string clears the selection
    #[arg(long)]
    pub device: Option<String>,

    /// Buffer time in microseconds (1-1000000)
    #[arg(long, allow_hyphen_values = true)]
    pub buffer_time: Option<String>,

    /// Period time in microseconds (1-1000000)
    #[arg(long, allow_hyphen_values = true)]
    pub period_time: Option<String>,

    /// Sample rate in Hz
    #[arg(long, allow_hyphen_values = true)]
    pub sample_rate: Option<String>,

    /// WAV output file
    #[arg(long, conflicts_with = "choose_file")]
    pub file_path: Option<String>,

    /// Ask for the WAV output file on the terminal
    #[arg(long)]
    pub choose_file: bool,

    /// Show the result without saving
    #[arg(long)]
    pub dry_run: bool,

    /// Print the resulting form as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the configure command
pub fn execute(args: ConfigureArgs) -> Result<()> {
    let mut store = crate::open_store(args.config.as_deref())?;
    let stdin = std::io::stdin();
    let mut chooser = PromptChooser::new(stdin.lock(), std::io::stdout());

    let view = run(
        &args,
        &mut store,
        BackendRegistry::compiled(),
        Box::new(NativeEnumerator::new()),
        &mut chooser,
    )?;
    print_view(&view, args.json)
}

/// Run one session against `store`. Returns the final form.
fn run(
    args: &ConfigureArgs,
    store: &mut dyn SettingsStore,
    registry: BackendRegistry,
    enumerator: Box<dyn DeviceEnumerator>,
    chooser: &mut dyn FileChooser,
) -> Result<FormView> {
    let mut form = ConfigForm::open(registry, enumerator, &*store);

    if let Err(e) = apply_edits(&mut form, args, chooser) {
        form.discard();
        return Err(e.context("Configuration not saved"));
    }

    let view = form.view();
    if args.dry_run {
        info!("Dry run, discarding changes");
        form.discard();
    } else {
        form.commit(store).context("Failed to save audio configuration")?;
    }
    Ok(view)
}

fn apply_edits(
    form: &mut ConfigForm,
    args: &ConfigureArgs,
    chooser: &mut dyn FileChooser,
) -> Result<()> {
    if let Some(system) = &args.system {
        form.select_backend_by_name(system)?;
    }
    if let Some(device) = &args.device {
        let device = Some(device.as_str()).filter(|d| !d.is_empty());
        form.select_device(device)?;
    }
    if let Some(input) = &args.buffer_time {
        form.set_buffer_time(input)?;
    }
    if let Some(input) = &args.period_time {
        form.set_period_time(input)?;
    }
    if let Some(input) = &args.sample_rate {
        form.set_sample_rate(input)?;
    }
    if let Some(path) = &args.file_path {
        form.set_file_path(path.as_str())?;
    }
    if args.choose_file && !form.choose_file_path(chooser)? {
        info!("No file selected, keeping the current path");
    }
    Ok(())
}
