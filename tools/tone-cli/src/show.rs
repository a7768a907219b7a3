//! Show command - print the persisted configuration as the form sees it

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tonecanvas_core::{
    BackendRegistry, ConfigForm, FORM_TITLE, FieldState, FormView, NativeEnumerator,
};

/// Arguments for the show command
#[derive(Args)]
pub struct ShowArgs {
    /// Settings file (defaults to audio.toml in the config directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the form as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the show command
pub fn execute(args: ShowArgs) -> Result<()> {
    let store = crate::open_store(args.config.as_deref())?;
    let form = ConfigForm::open(
        BackendRegistry::compiled(),
        Box::new(NativeEnumerator::new()),
        &store,
    );

    print_view(&form.view(), args.json)?;
    form.discard();
    Ok(())
}

/// Print a form snapshot as text or JSON.
pub(crate) fn print_view(view: &FormView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", render(view));
    }
    Ok(())
}

fn render(view: &FormView) -> String {
    let mut out = format!("{FORM_TITLE}\n  Audio system: {}\n", view.display_name);

    for field in view.visible_fields() {
        let value = field.value.as_deref().unwrap_or("(not set)");
        let value = if value.is_empty() { "(empty)" } else { value };
        out.push_str(&format!("  {}: {}", field.label, value));
        if field.state == FieldState::ReadOnly {
            out.push_str(" (fixed)");
        }
        if let Some(hint) = &field.default_hint {
            out.push_str(&format!("  [{hint}]"));
        }
        out.push('\n');
    }

    if !view.devices.is_empty() {
        out.push_str("  Available devices:\n");
        for device in &view.devices {
            out.push_str(&format!("    {device}\n"));
        }
    }
    out
}
