//! Output formatting: table, JSON, YAML, plain, plus status lines.
//!
//! Command results go to stdout in the format selected by `--output`.
//! Progress and warnings go to stderr as `[INFO]` / `[WARN]` lines so they
//! never mix with machine-readable output.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Whether color should be used on a stream, given whether it is a tty.
pub fn should_color(mode: &ColorMode, is_terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => is_terminal && std::env::var("NO_COLOR").is_err(),
    }
}

// ── Status lines ─────────────────────────────────────────────────────

/// `[INFO] ...` on stderr, unless `--quiet`.
pub fn info(global: &GlobalOpts, msg: &str) {
    if global.quiet {
        return;
    }
    let marker = if should_color(&global.color, io::stderr().is_terminal()) {
        "[INFO]".green().to_string()
    } else {
        "[INFO]".to_string()
    };
    let _ = writeln!(io::stderr().lock(), "{marker} {msg}");
}

/// `[WARN] ...` on stderr. Shown even with `--quiet`.
pub fn warn(global: &GlobalOpts, msg: &str) {
    let marker = if should_color(&global.color, io::stderr().is_terminal()) {
        "[WARN]".yellow().bold().to_string()
    } else {
        "[WARN]".to_string()
    };
    let _ = writeln!(io::stderr().lock(), "{marker} {msg}");
}

/// Emphasize a value in stdout output.
pub fn highlight(global: &GlobalOpts, value: &str) -> String {
    if should_color(&global.color, io::stdout().is_terminal()) {
        value.cyan().bold().to_string()
    } else {
        value.to_string()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build an aligned table
/// - `json` / `json-compact` / `yaml`: serializes the underlying data via serde
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, io::Error>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single item; table mode delegates to `detail_fn`.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, io::Error>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::blank()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, io::Error> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(io::Error::other)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, io::Error> {
    serde_yaml::to_string(data).map_err(io::Error::other)
}
