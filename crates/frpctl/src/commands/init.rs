//! `frpctl init`: prepare the workspace and write a fresh client config.
//!
//! Not a merge: the tunnel list always starts out empty, whatever the
//! previous document held.

use tracing::debug;

use frpctl_core::{ClientDocument, Environment};

use crate::cli::{GlobalOpts, InitArgs};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: InitArgs, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let layout = &ctx.layout;
    ctx.controller().ensure_available()?;

    for dir in [layout.root().to_path_buf(), layout.logs_dir()] {
        std::fs::create_dir_all(&dir).map_err(|source| CliError::WriteError {
            path: dir.display().to_string(),
            source,
        })?;
    }
    debug!(stage = "start", workdir = %layout.root().display(), "init");

    let domain = match args.server.filter(|s| !s.trim().is_empty()) {
        Some(domain) => domain.trim().to_owned(),
        None => util::prompt_text("server", "frp server domain")?,
    };
    if domain.is_empty() {
        return Err(CliError::InvalidArgument {
            field: "server".into(),
            reason: "the server domain cannot be empty".into(),
        });
    }
    let token = match args.token {
        Some(token) => token,
        None => util::prompt_secret("token", "Auth token")?,
    };
    debug!(stage = "validated", %domain, "init");

    if !confirm_discard(ctx, global)? {
        output::info(global, "Aborted; existing configuration left untouched");
        return Ok(());
    }

    let env = Environment::new(domain, token);
    ctx.env_store().save(&env)?;
    let repo = ctx.repository();
    repo.save(&ClientDocument::new(&env.domain, ctx.tool.server_port, env.token()))?;
    debug!(stage = "mutated", "init");

    ctx.tool.descriptor.write(&layout.compose_file())?;
    debug!(stage = "applied", "init");

    output::info(global, "Initialization complete");
    output::info(global, &format!("Config file: {}", repo.path().display()));
    output::info(global, "Run 'frpctl add <port>' to add a tunnel");
    Ok(())
}

/// Warn when re-running init would drop configured tunnels. Asks on an
/// interactive terminal (unless `--yes`); scripted runs go ahead.
fn confirm_discard(ctx: &Context, global: &GlobalOpts) -> Result<bool, CliError> {
    let repo = ctx.repository();
    if !repo.exists() {
        return Ok(true);
    }
    let count = match repo.load() {
        Ok(doc) => doc.entries().len(),
        Err(e) => {
            debug!(error = %e, "existing config unreadable, overwriting");
            return Ok(true);
        }
    };
    if count == 0 {
        return Ok(true);
    }

    output::warn(
        global,
        &format!("init rewrites {} and discards its {count} tunnel(s)", repo.path().display()),
    );
    if util::is_interactive() {
        util::confirm("Continue and start from an empty tunnel list?", global.yes)
    } else {
        Ok(true)
    }
}
