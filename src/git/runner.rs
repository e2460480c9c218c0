//! External command execution.
//!
//! Every git operation is expressed as an [Invocation] and handed to a
//! [CommandRunner]. The runner is the only place that touches processes;
//! everything above it works with plain strings and [CommandFailure]s.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// What to execute: an argv vector or a line for the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    Argv { program: String, args: Vec<String> },
    Shell(String),
}

/// A single command together with the directory it runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub line: CommandLine,
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    /// Build a `git` invocation from its arguments
    pub fn git<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation {
            line: CommandLine::Argv {
                program: "git".to_string(),
                args: args.into_iter().map(Into::into).collect(),
            },
            cwd: None,
        }
    }

    /// Build an invocation that is interpreted by the system shell
    ///
    /// Used for user supplied command strings (changelog commands) that may
    /// carry their own quoting.
    pub fn shell(line: impl Into<String>) -> Self {
        Invocation {
            line: CommandLine::Shell(line.into()),
            cwd: None,
        }
    }

    /// Append further arguments (ignored for shell lines)
    pub fn args<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let CommandLine::Argv { args, .. } = &mut self.line {
            args.extend(extra.into_iter().map(Into::into));
        }
        self
    }

    /// Run the command in `dir` instead of the process working directory
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Arguments of an argv invocation; empty for shell lines
    pub fn argv(&self) -> &[String] {
        match &self.line {
            CommandLine::Argv { args, .. } => args,
            CommandLine::Shell(_) => &[],
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.line {
            CommandLine::Argv { program, args } => {
                write!(f, "{}", program)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                Ok(())
            }
            CommandLine::Shell(line) => write!(f, "{}", line),
        }
    }
}

/// Options attached to a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// The command does not modify repository state
    pub read_only: bool,
}

impl RunOptions {
    pub fn read_only() -> Self {
        RunOptions { read_only: true }
    }

    pub fn mutating() -> Self {
        RunOptions { read_only: false }
    }
}

/// A command that could not be spawned or exited unsuccessfully
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{command}` failed: {output}")]
pub struct CommandFailure {
    /// The command as it was displayed/executed
    pub command: String,
    /// Exit code, `None` when the process never ran or was killed by a signal
    pub exit_code: Option<i32>,
    /// Captured stderr followed by stdout
    pub output: String,
}

/// Executes invocations on behalf of the git layer
///
/// Implementations must not retry: a failure is reported exactly once.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `invocation`, returning its trimmed stdout on success
    async fn run(
        &self,
        invocation: &Invocation,
        options: RunOptions,
    ) -> Result<String, CommandFailure>;
}

/// Runner backed by real processes
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    dry_run: bool,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip every invocation that is not marked read-only
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn command_for(invocation: &Invocation) -> Command {
        let mut cmd = match &invocation.line {
            CommandLine::Argv { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
            CommandLine::Shell(line) if cfg!(windows) => {
                let mut cmd = Command::new("cmd");
                cmd.arg("/C").arg(line);
                cmd
            }
            CommandLine::Shell(line) => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(line);
                cmd
            }
        };

        if let Some(dir) = &invocation.cwd {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        invocation: &Invocation,
        options: RunOptions,
    ) -> Result<String, CommandFailure> {
        if self.dry_run && !options.read_only {
            log::info!("$ {} (dry run, skipped)", invocation);
            return Ok(String::new());
        }

        log::debug!("$ {}", invocation);

        let output = Self::command_for(invocation)
            .output()
            .await
            .map_err(|e| CommandFailure {
                command: invocation.to_string(),
                exit_code: None,
                output: format!("Failed to execute: {}", e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut text = stderr.trim().to_string();
            if !stdout.is_empty() {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&stdout);
            }
            return Err(CommandFailure {
                command: invocation.to_string(),
                exit_code: output.status.code(),
                output: text,
            });
        }

        if !stdout.is_empty() {
            log::trace!("{}", stdout);
        }

        Ok(stdout)
    }
}
