//! `frpctl ls`: show configured tunnels. Read-only, no engine calls.

use tabled::Tabled;

use frpctl_core::TunnelEntry;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TunnelRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&TunnelEntry> for TunnelRow {
    fn from(e: &TunnelEntry) -> Self {
        Self {
            name: e.name.clone(),
            port: e.local_port.to_string(),
            url: e.public_url().unwrap_or_default(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let doc = ctx.repository().load()?;
    let entries = doc.entries();

    if entries.is_empty() && matches!(global.output, OutputFormat::Table) {
        output::info(global, "No tunnels configured");
        return Ok(());
    }

    let out = output::render_list(&global.output, entries, |e| TunnelRow::from(e), |e| e.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
