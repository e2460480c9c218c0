//! Git operations over an external `git` binary
//!
//! This module mediates between the release workflow and git. It decides
//! which command to run and classifies what came back; spawning processes is
//! left to a [CommandRunner].
//!
//! # Overview
//!
//! - [runner]: the [CommandRunner] seam plus the tokio backed [ProcessRunner]
//! - [mock]: a scripted [MockRunner] for tests
//! - [query]: read-only probes (repository, branch, tags, remotes)
//! - [mutation]: clone, stage, reset, commit, tag, push
//! - [changelog]: changelog generation from commit history
//! - [outcome]: the shared failure policy
//!
//! # Usage
//!
//! ```rust,no_run
//! # use release_git::git::{Git, GitContext, ProcessRunner};
//! # async fn example() -> release_git::Result<()> {
//! let git = Git::new(ProcessRunner::new(), GitContext::new("."));
//! if git.is_git_repo().await {
//!     println!("latest release: {:?}", git.latest_tag().await);
//! }
//! # Ok(())
//! # }
//! ```

pub mod changelog;
pub mod mock;
pub mod mutation;
pub mod outcome;
pub mod query;
pub mod runner;

pub use mock::MockRunner;
pub use outcome::{FailurePolicy, FatalKind, Outcome};
pub use runner::{CommandFailure, CommandRunner, Invocation, ProcessRunner, RunOptions};

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Explicit replacement for process-wide state
///
/// Every command runs in `cwd` unless an operation names another directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitContext {
    pub cwd: PathBuf,
    /// Print a separator after changelog output
    pub verbose: bool,
}

impl GitContext {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        GitContext {
            cwd: cwd.into(),
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Git facade: every query, mutation and the changelog generator
///
/// Holds no repository state; each call re-queries git.
#[derive(Debug)]
pub struct Git<R: CommandRunner> {
    runner: R,
    context: GitContext,
}

impl<R: CommandRunner> Git<R> {
    pub fn new(runner: R, context: GitContext) -> Self {
        Git { runner, context }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn context(&self) -> &GitContext {
        &self.context
    }

    /// A git invocation rooted at the context working directory
    pub(crate) fn git<I, S>(&self, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Invocation::git(args).in_dir(&self.context.cwd)
    }

    /// Resolve `path` against the context working directory
    pub(crate) fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.context.cwd.join(path)
        }
    }

    /// Run `invocation` and classify the result under `policy`
    pub(crate) async fn exec(
        &self,
        invocation: Invocation,
        options: RunOptions,
        policy: FailurePolicy,
    ) -> Result<Outcome> {
        let result = self.runner.run(&invocation, options).await;
        policy.classify(result)
    }

    /// Run a read-only probe; failure means "absent"
    pub(crate) async fn probe(&self, invocation: Invocation) -> Option<String> {
        match self
            .exec(invocation, RunOptions::read_only(), FailurePolicy::SilentProbe)
            .await
        {
            Ok(outcome) => outcome.into_output(),
            Err(_) => None,
        }
    }
}
