use thiserror::Error;

use crate::git::runner::CommandFailure;

/// Unified error type for release-git operations
#[derive(Error, Debug)]
pub enum ReleaseGitError {
    #[error("Unable to clone {repo}: {source}")]
    Clone {
        repo: String,
        #[source]
        source: CommandFailure,
    },

    #[error("Unable to commit: {0}")]
    Commit(#[source] CommandFailure),

    #[error("Could not create changelog ({command}): {source}")]
    ChangelogCreation {
        command: String,
        #[source]
        source: CommandFailure,
    },

    #[error("Git command failed: {0}")]
    Command(#[from] CommandFailure),

    #[error("Not a git repository")]
    NotARepository,

    #[error("Working dir must be clean")]
    DirtyWorkingDir,

    #[error("No upstream configured for current branch")]
    NoUpstream,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-git
pub type Result<T> = std::result::Result<T, ReleaseGitError>;

impl ReleaseGitError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseGitError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseGitError::Version(msg.into())
    }
}
