//! `frpctl rm <name>`: drop a tunnel and restart the client.

use tracing::debug;

use crate::cli::{GlobalOpts, RemoveArgs};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: RemoveArgs, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let repo = ctx.repository();
    let mut doc = repo.load()?;
    debug!(stage = "validated", name = %args.name, "remove");

    let removed = doc.remove_entry(&args.name)?;
    debug!(stage = "mutated", tunnels = doc.entries().len(), "remove");

    let controller = ctx.controller();
    controller.ensure_available()?;
    repo.save(&doc)?;
    let action = controller.apply().await?;
    debug!(stage = "applied", %action, "remove");

    output::info(global, &format!("Removed tunnel: {}", removed.name));
    Ok(())
}
