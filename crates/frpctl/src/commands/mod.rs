//! Command dispatch: bridges CLI args -> workspace operations -> output.
//!
//! Each handler is a short linear sequence (start, validated, mutated,
//! applied) that bails out with the first error.

pub mod add;
pub mod init;
pub mod list;
pub mod remove;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a workspace command to its handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Init(args) => init::handle(args, ctx, global),
        Command::Add(args) => add::handle(args, ctx, global).await,
        Command::Remove(args) => remove::handle(args, ctx, global).await,
        Command::List => list::handle(ctx, global),
        // Handled before a context is resolved
        Command::Completions(_) | Command::PrimeCertificate(_) => unreachable!(),
    }
}
