//! Clap derive structures for the `frpctl` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// frpctl -- manage frp client tunnels running under docker compose
#[derive(Debug, Parser)]
#[command(
    name = "frpctl",
    version,
    about = "Manage frp client tunnels from the command line",
    long_about = "Keeps a local frpc.toml in sync with a containerized frp client.\n\n\
        `init` prepares the workspace, `add` and `rm` edit the tunnel list and\n\
        restart the client, `ls` shows what is configured.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Workspace directory holding .env, frpc.toml and docker-compose.yaml
    #[arg(
        long,
        short = 'w',
        env = "FRPCTL_WORKDIR",
        default_value = "client",
        global = true
    )]
    pub workdir: PathBuf,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FRPCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one tunnel name per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize the frp client workspace (discards existing tunnels)
    Init(InitArgs),

    /// Add a tunnel to a local port and restart the client
    Add(AddArgs),

    /// Remove a tunnel and restart the client
    #[command(name = "rm", visible_alias = "remove")]
    Remove(RemoveArgs),

    /// List configured tunnels
    #[command(name = "ls", visible_alias = "list")]
    List,

    /// Generate shell completions
    Completions(CompletionsArgs),

    /// Send one HTTPS request to a tunnel host (run detached by `add`)
    #[command(name = "prime-certificate", hide = true)]
    PrimeCertificate(PrimeCertificateArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// frp server domain (prompted for when omitted)
    #[arg(long, short = 's', env = "FRP_SERVER")]
    pub server: Option<String>,

    /// Server auth token (prompted for when omitted)
    #[arg(long, short = 't', env = "FRP_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Debug, Args)]
#[command(long_about = "Add a tunnel to a local port.\n\n\
    When NAME is omitted a random 16-character hex name is generated.\n\
    The tunnel is published as https://<name>.<server domain>.")]
pub struct AddArgs {
    /// Local port the tunnel forwards to
    #[arg(allow_hyphen_values = true)]
    pub port: String,

    /// Tunnel name (random when omitted)
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Name of the tunnel to remove
    pub name: String,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[derive(Debug, Args)]
pub struct PrimeCertificateArgs {
    /// Host to request `https://<host>` from
    pub host: String,

    /// Give up after this many seconds
    #[arg(long, default_value_t = 3)]
    pub timeout_secs: u64,
}
