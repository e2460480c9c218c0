//! Read-only repository probes.
//!
//! Apart from [Git::root_dir], a probe never fails: a command error means
//! the thing asked about is not there.

use std::path::{Path, PathBuf};

use crate::domain::push::is_remote_name;
use crate::domain::RepoRef;
use crate::error::Result;
use crate::git::{CommandRunner, FailurePolicy, FatalKind, Git, RunOptions};

impl<R: CommandRunner> Git<R> {
    /// Whether the context directory is inside a git repository
    pub async fn is_git_repo(&self) -> bool {
        self.probe(self.git(["rev-parse", "--git-dir"])).await.is_some()
    }

    /// Absolute top-level directory of the repository
    pub async fn root_dir(&self) -> Result<PathBuf> {
        let outcome = self
            .exec(
                self.git(["rev-parse", "--show-toplevel"]),
                RunOptions::read_only(),
                FailurePolicy::Fatal(FatalKind::Command),
            )
            .await?;
        Ok(PathBuf::from(outcome.into_output().unwrap_or_default()))
    }

    /// Whether the context directory is the repository root
    pub async fn is_at_repo_root(&self) -> Result<bool> {
        let root = self.root_dir().await?;
        Ok(same_dir(&self.context().cwd, &root))
    }

    /// Whether the current branch tracks an upstream branch
    pub async fn has_upstream_branch(&self) -> bool {
        self.probe(self.git(["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"]))
            .await
            .is_some()
    }

    /// Name of the checked out branch, `None` on a detached HEAD
    pub async fn current_branch_name(&self) -> Option<String> {
        self.probe(self.git(["symbolic-ref", "--short", "HEAD"]))
            .await
            .filter(|name| !name.is_empty())
    }

    /// Whether `refs/tags/<tag_name>` exists
    pub async fn tag_exists(&self, tag_name: &str) -> bool {
        let reference = format!("refs/tags/{}", tag_name);
        self.probe(self.git(["show-ref", "--tags", "--quiet", "--verify", "--", reference.as_str()]))
            .await
            .is_some()
    }

    /// Url of a remote; input that already looks like a url is returned as is
    pub async fn remote_url(&self, remote_name_or_url: &str) -> Option<String> {
        if !is_remote_name(remote_name_or_url) {
            return Some(remote_name_or_url.to_string());
        }
        let key = format!("remote.{}.url", remote_name_or_url);
        self.probe(self.git(["config", "--get", key.as_str()]))
            .await
            .filter(|url| !url.is_empty())
    }

    /// Repository reference for a remote name or url
    pub async fn repo_ref(&self, remote_name_or_url: &str) -> Option<RepoRef> {
        let url = self.remote_url(remote_name_or_url).await?;
        RepoRef::from_url(&url)
    }

    /// No differences between the index/working tree and HEAD in tracked files
    pub async fn is_working_dir_clean(&self) -> bool {
        self.probe(self.git(["diff", "--quiet", "HEAD", "--"]))
            .await
            .is_some()
    }

    /// Most recent reachable tag, as named in the repository
    pub async fn latest_tag_name(&self) -> Option<String> {
        self.probe(self.git(["describe", "--tags", "--abbrev=0"]))
            .await
            .filter(|tag| !tag.is_empty())
    }

    /// Most recent reachable tag with a leading "v" stripped
    pub async fn latest_tag(&self) -> Option<String> {
        self.latest_tag_name()
            .await
            .map(|tag| strip_version_prefix(&tag).to_string())
    }

    /// Number of commits on HEAD since `tag`
    pub async fn commits_since(&self, tag: &str) -> Option<usize> {
        let range = format!("{}..HEAD", tag);
        self.probe(self.git(["rev-list", "--count", range.as_str()]))
            .await
            .and_then(|count| count.parse().ok())
    }
}

fn strip_version_prefix(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{GitContext, MockRunner};

    fn git(runner: MockRunner) -> Git<MockRunner> {
        Git::new(runner, GitContext::new("/work/repo"))
    }

    #[test]
    fn test_strip_version_prefix() {
        assert_eq!(strip_version_prefix("v1.2.3"), "1.2.3");
        assert_eq!(strip_version_prefix("1.2.3"), "1.2.3");
        assert_eq!(strip_version_prefix("vv1"), "v1");
    }

    #[tokio::test]
    async fn test_probes_are_read_only() {
        let git = git(MockRunner::new());
        git.is_git_repo().await;
        git.has_upstream_branch().await;
        git.current_branch_name().await;
        git.tag_exists("v1.0.0").await;
        git.remote_url("origin").await;
        git.is_working_dir_clean().await;
        git.latest_tag().await;

        let calls = git.runner().calls();
        assert_eq!(calls.len(), 7);
        assert!(calls.iter().all(|c| c.read_only));
    }

    #[tokio::test]
    async fn test_is_git_repo_false_on_failure() {
        let git = git(MockRunner::new().on_failure("git rev-parse", "not a git repository"));
        assert!(!git.is_git_repo().await);
    }

    #[tokio::test]
    async fn test_root_dir_failure_is_an_error() {
        let git = git(MockRunner::new().on_failure("git rev-parse --show-toplevel", "fatal"));
        assert!(git.root_dir().await.is_err());
    }

    #[tokio::test]
    async fn test_latest_tag_strips_v() {
        let git = git(MockRunner::new().on_success("git describe", "v1.2.3"));
        assert_eq!(git.latest_tag().await, Some("1.2.3".to_string()));
        assert_eq!(git.latest_tag_name().await, Some("v1.2.3".to_string()));
    }

    #[tokio::test]
    async fn test_latest_tag_none_without_tags() {
        let git = git(MockRunner::new().on_failure("git describe", "No names found"));
        assert_eq!(git.latest_tag().await, None);
    }

    #[tokio::test]
    async fn test_remote_url_passes_urls_through() {
        let git = git(MockRunner::new());
        let url = "https://github.com/owner/project.git";
        assert_eq!(git.remote_url(url).await, Some(url.to_string()));
        assert!(git.runner().calls().is_empty());
    }

    #[tokio::test]
    async fn test_remote_url_resolves_names() {
        let git = git(
            MockRunner::new().on_success("git config --get remote.origin.url", "git@h:o/p.git"),
        );
        assert_eq!(git.remote_url("origin").await, Some("git@h:o/p.git".to_string()));
    }

    #[tokio::test]
    async fn test_remote_url_unconfigured_is_none() {
        let git = git(MockRunner::new().on_failure("git config", ""));
        assert_eq!(git.remote_url("upstream").await, None);
    }

    #[tokio::test]
    async fn test_current_branch_none_when_detached() {
        let git = git(MockRunner::new().on_failure("git symbolic-ref", "ref HEAD is not a symbolic ref"));
        assert_eq!(git.current_branch_name().await, None);
    }

    #[tokio::test]
    async fn test_tag_exists_uses_exact_ref() {
        let git = git(MockRunner::new());
        assert!(git.tag_exists("v2.0.0").await);
        assert_eq!(
            git.runner().commands(),
            vec!["git show-ref --tags --quiet --verify -- refs/tags/v2.0.0".to_string()]
        );
    }

    #[tokio::test]
    async fn test_commits_since_parses_count() {
        let git = git(MockRunner::new().on_success("git rev-list --count v1.0.0..HEAD", "4"));
        assert_eq!(git.commits_since("v1.0.0").await, Some(4));
    }

    #[tokio::test]
    async fn test_repo_ref_from_remote() {
        let git = git(
            MockRunner::new()
                .on_success("git config --get remote.origin.url", "https://github.com/o/p.git"),
        );
        let repo = git.repo_ref("origin").await.unwrap();
        assert_eq!(repo.name, "o/p");
    }

    #[tokio::test]
    async fn test_is_at_repo_root_compares_paths() {
        let at_root = git(MockRunner::new().on_success("git rev-parse --show-toplevel", "/work/repo"));
        assert!(at_root.is_at_repo_root().await.unwrap());

        let nested = git(MockRunner::new().on_success("git rev-parse --show-toplevel", "/work"));
        assert!(!nested.is_at_repo_root().await.unwrap());
    }
}
