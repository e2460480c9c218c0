//! State-changing git operations.
//!
//! Staging, resetting and tagging are best-effort and only warn on failure.
//! Clone, commit and push failures are fatal, except for a commit that had
//! nothing to record.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{CommitSpec, PushSpec, PushTarget, StageAllSpec, TagSpec};
use crate::error::Result;
use crate::git::{CommandRunner, FailurePolicy, FatalKind, Git, Outcome, RunOptions};
use crate::warning::OperationWarning;

fn nothing_to_commit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"nothing (added )?to commit").expect("valid commit regex"))
}

/// Split `url#branch` into the url and the optional branch
pub fn split_repo_specifier(repo_specifier: &str) -> (&str, Option<&str>) {
    match repo_specifier.split_once('#') {
        Some((url, branch)) if !branch.is_empty() => (url, Some(branch)),
        Some((url, _)) => (url, None),
        None => (repo_specifier, None),
    }
}

fn to_strings<I>(paths: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    paths.into_iter().map(|p| p.as_ref().to_string()).collect()
}

impl<R: CommandRunner> Git<R> {
    /// Clone `repo_specifier` (optionally `url#branch`) into `target_dir`
    pub async fn clone_repo(&self, repo_specifier: &str, target_dir: &Path) -> Result<Outcome> {
        let (url, branch) = split_repo_specifier(repo_specifier);

        let mut args = vec!["clone".to_string()];
        if let Some(branch) = branch {
            args.extend(["--branch".to_string(), branch.to_string(), "--single-branch".to_string()]);
        }
        args.push(url.to_string());
        args.push(target_dir.display().to_string());

        self.exec(
            self.git(args),
            RunOptions::mutating(),
            FailurePolicy::Fatal(FatalKind::Clone {
                repo: url.to_string(),
            }),
        )
        .await
    }

    /// Stage one or more paths in a single `git add`
    pub async fn stage<I>(&self, paths: I) -> Result<Outcome>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let files = to_strings(paths);
        let invocation = self.git(["add"]).args(files.clone());
        self.exec(
            invocation,
            RunOptions::mutating(),
            FailurePolicy::WarnAndContinue(OperationWarning::StageFailed { files }),
        )
        .await
    }

    /// Stage every modified file below `spec.base_dir`
    pub async fn stage_all(&self, spec: &StageAllSpec) -> Result<Outcome> {
        let base_dir = spec.base_dir.display().to_string();
        let mode = if spec.add_untracked_files {
            "--all"
        } else {
            "--update"
        };
        self.exec(
            self.git(["add", base_dir.as_str(), mode]),
            RunOptions::mutating(),
            FailurePolicy::WarnAndContinue(OperationWarning::StageFailed {
                files: vec![base_dir.clone()],
            }),
        )
        .await
    }

    /// Restore paths to their HEAD content
    pub async fn reset<I>(&self, paths: I) -> Result<Outcome>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let files = to_strings(paths);
        let invocation = self.git(["checkout", "HEAD", "--"]).args(files.clone());
        self.exec(
            invocation,
            RunOptions::mutating(),
            FailurePolicy::WarnAndContinue(OperationWarning::ResetFailed { files }),
        )
        .await
    }

    /// Short status of tracked files
    pub async fn status(&self) -> Result<String> {
        let outcome = self
            .exec(
                self.git(["status", "--short", "--untracked-files=no"]),
                RunOptions::read_only(),
                FailurePolicy::Fatal(FatalKind::Command),
            )
            .await?;
        Ok(outcome.into_output().unwrap_or_default())
    }

    /// Commit staged changes in `spec.path`
    ///
    /// An empty commit is not an error: the existing commit will be tagged.
    pub async fn commit(&self, spec: &CommitSpec) -> Result<Outcome> {
        let invocation = self
            .git(["commit", "--message", spec.message.as_str()])
            .args(spec.extra_args.iter().cloned())
            .in_dir(self.resolve(&spec.path));

        let result = self.runner().run(&invocation, RunOptions::mutating()).await;
        let policy = match &result {
            Err(failure) if nothing_to_commit_re().is_match(&failure.output) => {
                FailurePolicy::WarnAndContinue(OperationWarning::NothingToCommit)
            }
            _ => FailurePolicy::Fatal(FatalKind::Commit),
        };
        policy.classify(result)
    }

    /// Create an annotated tag
    pub async fn tag(&self, spec: &TagSpec) -> Result<Outcome> {
        let invocation = self
            .git(["tag", "--annotate", "--message", spec.annotation.as_str()])
            .args(spec.extra_args.iter().cloned())
            .args([spec.name.as_str()]);
        self.exec(
            invocation,
            RunOptions::mutating(),
            FailurePolicy::WarnAndContinue(OperationWarning::TagMayExist {
                tag: spec.name.clone(),
            }),
        )
        .await
    }

    /// Push commits and tags to the resolved target
    pub async fn push(&self, spec: &PushSpec) -> Result<Outcome> {
        let mut target = PushTarget::resolve(&spec.push_repo, spec.has_upstream_branch);
        if target.needs_branch() {
            target = target.with_branch(self.current_branch_name().await);
        }
        log::debug!("pushing to '{}'", target);

        let invocation = self
            .git(["push", "--follow-tags"])
            .args(spec.extra_args.iter().cloned())
            .args(target.to_args());
        self.exec(
            invocation,
            RunOptions::mutating(),
            FailurePolicy::Fatal(FatalKind::Command),
        )
        .await
    }
}
