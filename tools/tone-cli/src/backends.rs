//! Backends command - list compiled-in backends and their capabilities

use anyhow::Result;
use clap::Args;
use tonecanvas_core::{BackendDescriptor, BackendRegistry, Field};

/// Arguments for the backends command
#[derive(Args)]
pub struct BackendsArgs {
    /// Print the registry as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the backends command
pub fn execute(args: BackendsArgs) -> Result<()> {
    let registry = BackendRegistry::compiled();

    if args.json {
        println!("{}", serde_json::to_string_pretty(registry.backends())?);
        return Ok(());
    }

    for backend in registry.backends() {
        println!("{}", describe(backend));
    }
    Ok(())
}

/// One line per backend: id, display name and the fields it shows.
fn describe(backend: &BackendDescriptor) -> String {
    let caps = backend.capabilities;
    let fields: Vec<String> = Field::ALL
        .into_iter()
        .filter_map(|field| {
            let state = caps.field_state(field);
            if !state.is_visible() {
                None
            } else if state.is_editable() {
                Some(field.to_string())
            } else {
                Some(format!("{field} (fixed)"))
            }
        })
        .collect();

    let fields = if fields.is_empty() {
        "no settings".to_string()
    } else {
        fields.join(", ")
    };
    format!("{:<6} {:<16} {}", backend.id, backend.display_name, fields)
}
