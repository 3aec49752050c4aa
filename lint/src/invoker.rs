//! Builds the tool command line and runs it out-of-process.

use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::Context as _;
use tokio::process::Command;

use crate::error::LintError;
use crate::types::LintConfig;

/// Fixed flag asking the tool to prefix each diagnostic with its message id.
const INCLUDE_IDS_FLAG: &str = "--include-ids=y";

/// A fully resolved invocation: interpreter, script, arguments, cwd.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    interpreter: PathBuf,
    script: PathBuf,
    args: Vec<String>,
    working_dir: PathBuf,
}

impl ToolCommand {
    #[must_use]
    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    #[must_use]
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Arguments after the script path, in invocation order.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.interpreter.display(), self.script.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured output of a finished tool process.
///
/// Streams are collected whole after exit — the tool is assumed to
/// terminate and flush before parsing begins; nothing is streamed
/// incrementally to the parser.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Seam between the worker pipeline and the real process spawn.
///
/// Production uses [`PylintRunner`]; tests substitute a stub so the
/// admission and reconciliation properties can be exercised without
/// spawning anything.
pub trait ToolRunner: Send + Sync + 'static {
    /// Run the command to completion and capture both streams.
    ///
    /// Blocks (asynchronously) until the process exits; a hung tool keeps
    /// its worker's admission slot occupied. Any external timeout/kill is
    /// the host's concern.
    fn run(
        &self,
        command: &ToolCommand,
    ) -> impl Future<Output = Result<ToolOutput, LintError>> + Send;
}

/// Resolve the command line for one run.
///
/// Argument order is fixed: the id flag, then the user's extra arguments
/// (whitespace-tokenized, with newlines counting as separators), then the
/// absolute target path. The working directory is the target's parent so
/// relative imports resolve the way the tool expects.
pub(crate) fn build_command(
    config: &LintConfig,
    target: &Path,
) -> Result<ToolCommand, LintError> {
    let interpreter = resolve_interpreter(config)?;

    let mut args = vec![INCLUDE_IDS_FLAG.to_string()];
    args.extend(config.extra_args.split_whitespace().map(ToOwned::to_owned));
    args.push(target.display().to_string());

    let working_dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok(ToolCommand {
        interpreter,
        script: config.tool_path.clone(),
        args,
        working_dir,
    })
}

/// Explicitly configured interpreter, or PATH lookup.
///
/// Failure here is a configuration precondition, not a retryable fault.
fn resolve_interpreter(config: &LintConfig) -> Result<PathBuf, LintError> {
    if let Some(explicit) = &config.interpreter {
        return Ok(explicit.clone());
    }
    which::which("python3")
        .or_else(|_| which::which("python"))
        .map_err(|err| {
            LintError::Configuration(format!("no python interpreter found on PATH: {err}"))
        })
}

/// Production runner: spawns the interpreter on the tool script and waits
/// for it to exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct PylintRunner;

impl ToolRunner for PylintRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput, LintError> {
        let mut cmd = Command::new(command.interpreter());
        cmd.arg(command.script())
            .args(command.args())
            .current_dir(command.working_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = cmd
            .output()
            .await
            .with_context(|| format!("spawning {}", command.interpreter().display()))?;

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
