//! Outcome classification shared by every git operation.
//!
//! A raw command result is turned into one of three things: plain success,
//! success with a warning, or a typed error. Which one depends solely on the
//! [FailurePolicy] the operation hands in.

use crate::error::{ReleaseGitError, Result};
use crate::git::runner::CommandFailure;
use crate::ui;
use crate::warning::OperationWarning;

/// Result of an operation that did not fail fatally
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran; its trimmed stdout
    Succeeded(String),
    /// The command failed but the failure is recoverable
    Warned(OperationWarning),
    /// A read-only probe found nothing
    Absent,
}

impl Outcome {
    /// Stdout of a successful command
    pub fn output(&self) -> Option<&str> {
        match self {
            Outcome::Succeeded(out) => Some(out),
            _ => None,
        }
    }

    pub fn into_output(self) -> Option<String> {
        match self {
            Outcome::Succeeded(out) => Some(out),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }

    pub fn warning(&self) -> Option<&OperationWarning> {
        match self {
            Outcome::Warned(warning) => Some(warning),
            _ => None,
        }
    }
}

/// Which typed error a fatal failure becomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatalKind {
    Clone { repo: String },
    Commit,
    Changelog { command: String },
    Command,
}

/// How a failed command is reported to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Swallow the failure, the caller falls back to `false`/`None`
    SilentProbe,
    /// Log a trace, warn the user, and carry on
    WarnAndContinue(OperationWarning),
    /// Wrap the failure into a typed error
    Fatal(FatalKind),
}

impl FailurePolicy {
    /// Classify a command result according to this policy
    pub fn classify(self, result: std::result::Result<String, CommandFailure>) -> Result<Outcome> {
        let failure = match result {
            Ok(out) => return Ok(Outcome::Succeeded(out)),
            Err(failure) => failure,
        };

        match self {
            FailurePolicy::SilentProbe => {
                log::debug!("probe `{}` came back empty: {}", failure.command, failure.output);
                Ok(Outcome::Absent)
            }
            FailurePolicy::WarnAndContinue(warning) => {
                log::debug!("{}", failure);
                ui::display_warning(&warning);
                Ok(Outcome::Warned(warning))
            }
            FailurePolicy::Fatal(kind) => Err(match kind {
                FatalKind::Clone { repo } => {
                    log::error!("Unable to clone {}", repo);
                    ReleaseGitError::Clone {
                        repo,
                        source: failure,
                    }
                }
                FatalKind::Commit => ReleaseGitError::Commit(failure),
                FatalKind::Changelog { command } => ReleaseGitError::ChangelogCreation {
                    command,
                    source: failure,
                },
                FatalKind::Command => ReleaseGitError::Command(failure),
            }),
        }
    }
}
