//! Domain layer for `frpctl`: the frpc client document and the container
//! that runs it.
//!
//! - **[`ClientDocument`]**: the `frpc.toml` model, a server connection plus
//!   an insertion-ordered list of [`TunnelEntry`] values with unique names.
//!   [`TunnelRepository`] loads it fresh for every command and writes it
//!   back whole.
//!
//! - **[`ProcessController`]**: decides between `compose up -d` and
//!   `compose restart` for the frpc service and runs it, forwarding the
//!   engine's output. Command execution goes through the [`CommandRunner`]
//!   seam.
//!
//! - **[`probe`]**: diagnostics that never fail a command, namely a local port
//!   check and a detached HTTPS request that nudges certificate issuance.
//!
//! - **[`Environment`] / [`ToolConfig`] / [`WorkspaceLayout`]**: explicit
//!   configuration handed in by the caller; this crate never reads `.env`
//!   or settings files.

pub mod compose;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod names;
pub mod probe;
pub mod repository;

pub use compose::ComposeDescriptor;
pub use config::{Environment, ToolConfig, WorkspaceLayout};
pub use engine::{ApplyAction, CommandRunner, EngineCommand, ProcessController, RunOutcome, SystemRunner};
pub use error::CoreError;
pub use model::{AuthConfig, AuthMethod, ClientDocument, TunnelEntry, parse_port};
pub use names::generate_name;
pub use repository::TunnelRepository;
