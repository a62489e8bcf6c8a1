// ── Process controller ──
//
// Drives the frpc container through `<engine> compose`. The decision
// between "create and start" and "restart" is a plain check-then-act: the
// `ps` query and the follow-up action are not atomic, so another operator
// touching the same project in between can make the action fail. That
// failure is reported, never retried.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, info};

use crate::error::CoreError;

/// Engine executable used when nothing else is configured.
pub const DEFAULT_ENGINE: &str = "docker";

// ── Commands and their outcome ───────────────────────────────────────

/// A fully-specified engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    pub program: String,
    pub args: Vec<String>,
    pub dir: PathBuf,
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Result of running an engine command to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutcome {
    fn status_text(&self) -> String {
        self.code
            .map_or_else(|| "no exit code (terminated by signal)".into(), |c| format!("exit code {c}"))
    }
}

/// Which action `apply` ended up issuing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyAction {
    /// No instance existed: `compose up -d`.
    Start,
    /// An instance (running or stopped) existed: `compose restart`.
    Restart,
}

impl fmt::Display for ApplyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Restart => f.write_str("restart"),
        }
    }
}

// ── Runner seam ──────────────────────────────────────────────────────

/// Executes engine commands. The real implementation shells out; tests
/// script the responses.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run quietly and capture both streams.
    async fn capture(&self, cmd: &EngineCommand) -> io::Result<RunOutcome>;

    /// Run with both streams echoed live to our stderr, so engine chatter
    /// never lands in command output. Both are also collected into the
    /// outcome so failures can quote them.
    async fn forward(&self, cmd: &EngineCommand) -> io::Result<RunOutcome>;
}

/// Runs commands as child processes of the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn capture(&self, cmd: &EngineCommand) -> io::Result<RunOutcome> {
        let output = tokio::process::Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(&cmd.dir)
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(RunOutcome {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn forward(&self, cmd: &EngineCommand) -> io::Result<RunOutcome> {
        let mut child = tokio::process::Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(&cmd.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let (stdout, stderr) = tokio::join!(echo_lines(child.stdout.take()), echo_lines(child.stderr.take()));
        let status = child.wait().await?;

        Ok(RunOutcome {
            success: status.success(),
            code: status.code(),
            stdout: stdout?,
            stderr: stderr?,
        })
    }
}

/// Copy a child pipe to our stderr line by line and keep a copy.
/// Invalid UTF-8 is replaced, never an error.
async fn echo_lines<R>(pipe: Option<R>) -> io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return Ok(String::new());
    };
    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    let mut collected = String::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\n', '\r']);
        eprintln!("{line}");
        collected.push_str(line);
        collected.push('\n');
    }
    Ok(collected)
}

// ── Controller ───────────────────────────────────────────────────────

/// Starts or restarts the compose service living in a workspace directory.
#[derive(Debug, Clone)]
pub struct ProcessController<R = SystemRunner> {
    program: String,
    service: String,
    dir: PathBuf,
    runner: R,
}

impl ProcessController<SystemRunner> {
    pub fn new(program: impl Into<String>, service: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self::with_runner(program, service, dir, SystemRunner)
    }
}

impl<R: CommandRunner> ProcessController<R> {
    pub fn with_runner(
        program: impl Into<String>,
        service: impl Into<String>,
        dir: impl Into<PathBuf>,
        runner: R,
    ) -> Self {
        Self {
            program: program.into(),
            service: service.into(),
            dir: dir.into(),
            runner,
        }
    }

    /// Fail with `ToolMissing` unless the engine executable resolves.
    pub fn ensure_available(&self) -> Result<PathBuf, CoreError> {
        let resolved = which::which(&self.program).map_err(|e| {
            debug!(program = %self.program, error = %e, "engine lookup failed");
            CoreError::ToolMissing {
                tool: self.program.clone(),
            }
        })?;
        debug!(engine = %resolved.display(), "container engine found");
        Ok(resolved)
    }

    /// Bring the service in line with the config on disk.
    pub async fn apply(&self) -> Result<ApplyAction, CoreError> {
        let action = if self.instance_exists().await {
            ApplyAction::Restart
        } else {
            ApplyAction::Start
        };

        let cmd = self.action_command(action);
        info!(%action, command = %cmd, "applying tunnel configuration");

        let outcome = self.runner.forward(&cmd).await.map_err(|e| CoreError::ApplyFailed {
            action: cmd.to_string(),
            status: "failed to spawn".into(),
            diagnostic: e.to_string(),
        })?;

        if !outcome.success {
            return Err(CoreError::ApplyFailed {
                action: cmd.to_string(),
                status: outcome.status_text(),
                diagnostic: outcome.stderr.trim().to_owned(),
            });
        }

        Ok(action)
    }

    /// Whether compose knows about a running or stopped container for the
    /// service. Any query failure counts as "no instance".
    async fn instance_exists(&self) -> bool {
        let query = self.compose(&["ps", "-a", "-q", &self.service]);
        match self.runner.capture(&query).await {
            Ok(out) if out.success => {
                let found = !out.stdout.trim().is_empty();
                debug!(found, "queried existing instance");
                found
            }
            Ok(out) => {
                debug!(status = %out.status_text(), stderr = %out.stderr.trim(), "instance query failed");
                false
            }
            Err(e) => {
                debug!(error = %e, "instance query could not run");
                false
            }
        }
    }

    fn action_command(&self, action: ApplyAction) -> EngineCommand {
        match action {
            ApplyAction::Start => self.compose(&["up", "-d", &self.service]),
            ApplyAction::Restart => self.compose(&["restart", &self.service]),
        }
    }

    fn compose(&self, args: &[&str]) -> EngineCommand {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push("compose".to_owned());
        full.extend(args.iter().map(|a| (*a).to_owned()));
        EngineCommand {
            program: self.program.clone(),
            args: full,
            dir: self.dir.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use pretty_assertions::assert_eq;

    /// Replays canned outcomes and records every command it was asked to run.
    #[derive(Default)]
    struct ScriptedRunner {
        captures: RefCell<VecDeque<io::Result<RunOutcome>>>,
        forwards: RefCell<VecDeque<io::Result<RunOutcome>>>,
        seen: RefCell<Vec<String>>,
    }

    impl ScriptedRunner {
        fn on_capture(self, outcome: io::Result<RunOutcome>) -> Self {
            self.captures.borrow_mut().push_back(outcome);
            self
        }

        fn on_forward(self, outcome: io::Result<RunOutcome>) -> Self {
            self.forwards.borrow_mut().push_back(outcome);
            self
        }
    }

    impl CommandRunner for ScriptedRunner {
        async fn capture(&self, cmd: &EngineCommand) -> io::Result<RunOutcome> {
            self.seen.borrow_mut().push(cmd.to_string());
            self.captures.borrow_mut().pop_front().unwrap()
        }

        async fn forward(&self, cmd: &EngineCommand) -> io::Result<RunOutcome> {
            self.seen.borrow_mut().push(cmd.to_string());
            self.forwards.borrow_mut().pop_front().unwrap()
        }
    }

    fn ok(stdout: &str) -> io::Result<RunOutcome> {
        Ok(RunOutcome {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        })
    }

    fn failed(code: i32, stderr: &str) -> io::Result<RunOutcome> {
        Ok(RunOutcome {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        })
    }

    fn controller(runner: ScriptedRunner) -> ProcessController<ScriptedRunner> {
        ProcessController::with_runner("docker", "frpc", "/tmp/client", runner)
    }

    #[tokio::test]
    async fn starts_when_no_instance_exists() {
        let ctl = controller(ScriptedRunner::default().on_capture(ok("")).on_forward(ok("")));

        let action = ctl.apply().await.unwrap();

        assert_eq!(action, ApplyAction::Start);
        assert_eq!(
            *ctl.runner.seen.borrow(),
            vec![
                "docker compose ps -a -q frpc".to_string(),
                "docker compose up -d frpc".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn restarts_when_instance_exists() {
        let ctl = controller(
            ScriptedRunner::default()
                .on_capture(ok("3f2a9c1d\n"))
                .on_forward(ok("")),
        );

        let action = ctl.apply().await.unwrap();

        assert_eq!(action, ApplyAction::Restart);
        assert_eq!(ctl.runner.seen.borrow()[1], "docker compose restart frpc");
    }

    #[tokio::test]
    async fn query_failure_falls_back_to_start() {
        let ctl = controller(
            ScriptedRunner::default()
                .on_capture(Err(io::Error::other("daemon down")))
                .on_forward(ok("")),
        );

        assert_eq!(ctl.apply().await.unwrap(), ApplyAction::Start);
    }

    #[tokio::test]
    async fn failed_action_carries_engine_stderr() {
        let ctl = controller(
            ScriptedRunner::default()
                .on_capture(failed(1, "no configuration file provided"))
                .on_forward(failed(17, "Error response from daemon: conflict\n")),
        );

        let err = ctl.apply().await.unwrap_err();

        match err {
            CoreError::ApplyFailed {
                action,
                status,
                diagnostic,
            } => {
                assert_eq!(action, "docker compose up -d frpc");
                assert_eq!(status, "exit code 17");
                assert_eq!(diagnostic, "Error response from daemon: conflict");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn spawn_failure_is_apply_failed() {
        let ctl = controller(
            ScriptedRunner::default()
                .on_capture(ok(""))
                .on_forward(Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))),
        );

        let err = ctl.apply().await.unwrap_err();
        assert!(matches!(err, CoreError::ApplyFailed { .. }));
    }

    #[test]
    fn missing_engine_is_tool_missing() {
        let ctl = ProcessController::with_runner(
            "frpctl-definitely-not-an-engine",
            "frpc",
            "/tmp",
            ScriptedRunner::default(),
        );

        let err = ctl.ensure_available().unwrap_err();
        assert!(
            matches!(err, CoreError::ToolMissing { ref tool } if tool == "frpctl-definitely-not-an-engine")
        );
    }

    // ── SystemRunner against real children ──────────────────────────

    #[cfg(unix)]
    fn sh(script: &str) -> EngineCommand {
        EngineCommand {
            program: "sh".into(),
            args: vec!["-c".into(), script.into()],
            dir: std::env::temp_dir(),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn forward_tolerates_invalid_utf8_on_stderr() {
        let outcome = SystemRunner
            .forward(&sh(r"printf 'Progress \377 done\n' >&2; exit 0"))
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.code, Some(0));
        assert_eq!(outcome.stderr, "Progress \u{FFFD} done\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn forward_collects_stdout_separately_and_reports_exit_code() {
        let outcome = SystemRunner
            .forward(&sh("echo pulling; echo 'no such service' >&2; exit 4"))
            .await
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.code, Some(4));
        assert_eq!(outcome.stdout, "pulling\n");
        assert_eq!(outcome.stderr, "no such service\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn forward_keeps_last_line_without_newline() {
        let outcome = SystemRunner.forward(&sh("printf 'tail' >&2")).await.unwrap();
        assert_eq!(outcome.stderr, "tail\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn apply_succeeds_when_engine_prints_non_utf8_progress() {
        // `sh compose <args>` runs ./compose as a script, standing in for
        // `docker compose <args>`.
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("compose"),
            "case \"$1\" in\n  ps) exit 0 ;;\n  up) printf 'Progress \\377 done\\n' >&2; exit 0 ;;\nesac\nexit 1\n",
        )
        .unwrap();

        let ctl = ProcessController::new("sh", "frpc", dir.path());

        assert_eq!(ctl.apply().await.unwrap(), ApplyAction::Start);
    }
}
