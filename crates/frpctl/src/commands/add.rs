//! `frpctl add <port> [name]`: append a tunnel and restart the client.

use std::fmt::Write as _;
use std::io;
use std::time::Duration;

use tracing::debug;

use frpctl_core::{TunnelEntry, generate_name, parse_port, probe};

use crate::cli::{AddArgs, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: AddArgs, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let env_store = ctx.env_store();
    let env = env_store.load()?;
    if !env.has_domain() {
        return Err(CliError::NotInitialized {
            reason: format!("no DOMAIN found in {}", env_store.path().display()),
        });
    }

    let port = parse_port(&args.port)?;
    let tcp_port = u16::try_from(port).ok().filter(|p| *p != 0);
    if tcp_port.is_none() {
        output::warn(global, &format!("Port {port} is outside 1-65535; saving it anyway"));
    }
    let name = match args.name {
        Some(name) => name,
        None => {
            let name = generate_name();
            output::info(global, &format!("No name given, generated: {name}"));
            name
        }
    };
    debug!(stage = "validated", %name, port, "add");

    let repo = ctx.repository();
    let mut doc = repo.load()?;
    let entry = doc.add_entry(&name, port, &env.domain)?;
    debug!(stage = "mutated", tunnels = doc.entries().len(), "add");

    if let Some(tcp_port) = tcp_port.filter(|_| ctx.tool.probes) {
        warn_if_port_idle(ctx, global, tcp_port).await;
    }

    let controller = ctx.controller();
    controller.ensure_available()?;
    repo.save(&doc)?;
    let action = controller.apply().await?;
    debug!(stage = "applied", %action, "add");

    if ctx.tool.probes {
        if let Some(host) = entry.custom_domains.first() {
            output::info(global, "Triggering HTTPS certificate issuance...");
            if let Err(e) = launch_certificate_request(host, ctx.tool.https_probe_timeout) {
                debug!(error = %e, "could not launch certificate request");
            }
        }
    }

    let out = output::render_single(
        &global.output,
        &entry,
        |e| summary(e, global),
        |e| e.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Diagnostic only: nothing listening locally is worth a warning, not a
/// failure.
async fn warn_if_port_idle(ctx: &Context, global: &GlobalOpts, port: u16) {
    if !probe::local_port_reachable(port, ctx.tool.port_probe_timeout).await {
        output::warn(global, &format!("Nothing seems to be listening on local port {port} yet"));
    }
}

/// Re-run this binary as `frpctl prime-certificate <host>` in a detached
/// process, so the request survives this process exiting.
fn launch_certificate_request(host: &str, timeout: Duration) -> io::Result<()> {
    let exe = std::env::current_exe()?;
    let timeout_secs = timeout.as_secs().max(1).to_string();
    probe::spawn_detached(exe, &["prime-certificate", "--timeout-secs", timeout_secs.as_str(), host])?;
    Ok(())
}

fn summary(entry: &TunnelEntry, global: &GlobalOpts) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "=== Tunnel ready ===");
    let _ = writeln!(
        out,
        "Name       : {}  (use this name with `frpctl rm`)",
        output::highlight(global, &entry.name)
    );
    let _ = writeln!(out, "Local port : {}", entry.local_port);
    let _ = write!(
        out,
        "Public URL : {}",
        output::highlight(global, &entry.public_url().unwrap_or_default())
    );
    out
}
