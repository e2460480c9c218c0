// tests/git_repo_test.rs
//
// Runs the git facade against real repositories built with git2.
use std::fs;
use std::path::Path;
use std::process::Command;

use git2::{Repository, Signature};
use release_git::domain::{ChangelogSpec, CommitSpec, StageAllSpec, TagSpec};
use release_git::git::{Git, GitContext, Outcome, ProcessRunner};
use release_git::warning::OperationWarning;
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Repository with one commit containing README.md
fn init_repo(dir: &Path) -> Repository {
    let repo = Repository::init(dir).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Release Bot").unwrap();
        config.set_str("user.email", "release@example.com").unwrap();
        config.set_bool("commit.gpgsign", false).unwrap();
        config.set_bool("tag.gpgsign", false).unwrap();
    }
    fs::write(dir.join("README.md"), "# project\n").unwrap();
    commit_all(&repo, "Initial commit");
    repo
}

fn commit_all(repo: &Repository, message: &str) -> git2::Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = Signature::now("Release Bot", "release@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

fn tag_head(repo: &Repository, name: &str) {
    let head = repo.head().unwrap().peel(git2::ObjectType::Commit).unwrap();
    repo.tag_lightweight(name, &head, false).unwrap();
}

fn git_in(dir: &Path) -> Git<ProcessRunner> {
    Git::new(ProcessRunner::new(), GitContext::new(dir))
}

#[tokio::test]
async fn test_probes_on_fresh_repository() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let repo = init_repo(dir.path());
    let git = git_in(dir.path());

    assert!(git.is_git_repo().await);
    assert!(git.is_at_repo_root().await.unwrap());
    assert!(!git.has_upstream_branch().await);
    assert!(git.is_working_dir_clean().await);
    assert_eq!(git.latest_tag().await, None);
    assert!(!git.tag_exists("v1.0.0").await);
    assert_eq!(git.remote_url("origin").await, None);

    let head = repo.head().unwrap();
    assert_eq!(git.current_branch_name().await.as_deref(), head.shorthand());
}

#[tokio::test]
async fn test_probes_outside_repository() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let git = git_in(dir.path());
    assert!(!git.is_git_repo().await);
    assert!(git.root_dir().await.is_err());
}

#[tokio::test]
async fn test_subdirectory_is_not_repo_root() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    fs::create_dir(dir.path().join("sub")).unwrap();
    let git = git_in(&dir.path().join("sub"));
    assert!(git.is_git_repo().await);
    assert!(!git.is_at_repo_root().await.unwrap());
}

#[tokio::test]
async fn test_tags_and_remotes() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let repo = init_repo(dir.path());
    tag_head(&repo, "v1.0.0");
    repo.remote("origin", "https://github.com/owner/project.git")
        .unwrap();
    let git = git_in(dir.path());

    assert_eq!(git.latest_tag().await.as_deref(), Some("1.0.0"));
    assert!(git.tag_exists("v1.0.0").await);
    assert!(!git.tag_exists("v1.0").await);
    assert_eq!(
        git.remote_url("origin").await.as_deref(),
        Some("https://github.com/owner/project.git")
    );
    assert_eq!(git.repo_ref("origin").await.unwrap().name, "owner/project");

    fs::write(dir.path().join("a.txt"), "a").unwrap();
    commit_all(&repo, "Add a");
    assert_eq!(git.commits_since("v1.0.0").await, Some(1));
}

#[tokio::test]
async fn test_dirty_tree_then_reset() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    let git = git_in(dir.path());

    fs::write(dir.path().join("README.md"), "changed\n").unwrap();
    assert!(!git.is_working_dir_clean().await);
    assert!(git.status().await.unwrap().contains("README.md"));

    assert!(git.reset(["README.md"]).await.unwrap().is_success());
    assert!(git.is_working_dir_clean().await);
    assert_eq!(
        fs::read_to_string(dir.path().join("README.md")).unwrap(),
        "# project\n"
    );
}

#[tokio::test]
async fn test_rewritten_file_with_same_content_is_clean() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    let git = git_in(dir.path());

    // newer mtime, identical content
    std::thread::sleep(std::time::Duration::from_millis(1100));
    fs::write(dir.path().join("README.md"), "# project\n").unwrap();

    assert!(git.is_working_dir_clean().await);
}

#[tokio::test]
async fn test_stage_commit_and_tag() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    let git = git_in(dir.path());

    fs::write(dir.path().join("CHANGELOG.md"), "## 1.1.0\n").unwrap();
    assert!(git.stage(["CHANGELOG.md"]).await.unwrap().is_success());
    assert!(git
        .commit(&CommitSpec::new("Release 1.1.0"))
        .await
        .unwrap()
        .is_success());
    assert!(git
        .tag(&TagSpec::new("v1.1.0", "Release 1.1.0"))
        .await
        .unwrap()
        .is_success());

    assert!(git.tag_exists("v1.1.0").await);
    assert_eq!(git.latest_tag().await.as_deref(), Some("1.1.0"));

    let again = git.tag(&TagSpec::new("v1.1.0", "Release 1.1.0")).await.unwrap();
    assert_eq!(
        again,
        Outcome::Warned(OperationWarning::TagMayExist {
            tag: "v1.1.0".to_string()
        })
    );
}

#[tokio::test]
async fn test_commit_with_nothing_staged_warns() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    let git = git_in(dir.path());

    let outcome = git.commit(&CommitSpec::new("Release 1.0.1")).await.unwrap();
    assert_eq!(outcome, Outcome::Warned(OperationWarning::NothingToCommit));
}

#[tokio::test]
async fn test_stage_all_respects_untracked_flag() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    let git = git_in(dir.path());

    fs::write(dir.path().join("README.md"), "changed\n").unwrap();
    fs::write(dir.path().join("new.txt"), "new\n").unwrap();

    git.stage_all(&StageAllSpec::default()).await.unwrap();
    let status = git.status().await.unwrap();
    assert!(status.contains("M  README.md"));

    git.stage_all(&StageAllSpec {
        add_untracked_files: true,
        ..StageAllSpec::default()
    })
    .await
    .unwrap();
    let status = git.status().await.unwrap();
    assert!(status.contains("A  new.txt"));
}

#[tokio::test]
async fn test_changelog_since_latest_tag() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let repo = init_repo(dir.path());
    tag_head(&repo, "v1.0.0");
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    commit_all(&repo, "Add feature a");
    let git = git_in(dir.path());

    let spec = ChangelogSpec::new("git log --pretty=format:\"* %s\" [REV_RANGE]", "v${version}")
        .with_latest_version(Some("1.0.0".to_string()));
    let changelog = git.changelog(&spec).await.unwrap();
    assert_eq!(changelog.as_deref(), Some("* Add feature a"));

    let spec = ChangelogSpec::new("git log --pretty=format:\"* %s\" [REV_RANGE]", "v${version}")
        .with_latest_version(Some("0.9.0".to_string()));
    let changelog = git.changelog(&spec).await.unwrap().unwrap();
    assert!(changelog.contains("* Initial commit"));
}

#[tokio::test]
async fn test_clone_single_branch() {
    if !git_available() {
        return;
    }
    let source = TempDir::new().unwrap();
    let repo = init_repo(source.path());
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    repo.branch("release", &head, false).unwrap();

    let target = TempDir::new().unwrap();
    let clone_dir = target.path().join("clone");
    let specifier = format!("{}#release", source.path().display());

    let git = git_in(target.path());
    git.clone_repo(&specifier, &clone_dir).await.unwrap();

    let cloned = git_in(&clone_dir);
    assert_eq!(cloned.current_branch_name().await.as_deref(), Some("release"));
}

#[tokio::test]
async fn test_clone_failure_is_error() {
    if !git_available() {
        return;
    }
    let target = TempDir::new().unwrap();
    let git = git_in(target.path());
    let missing = target.path().join("missing-source");
    let err = git
        .clone_repo(&missing.display().to_string(), &target.path().join("out"))
        .await
        .unwrap_err();
    assert!(matches!(err, release_git::ReleaseGitError::Clone { .. }));
}

#[tokio::test]
async fn test_dry_run_skips_mutations() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    init_repo(dir.path());
    let git = Git::new(ProcessRunner::new().dry_run(true), GitContext::new(dir.path()));

    git.tag(&TagSpec::new("v9.9.9", "never")).await.unwrap();
    assert!(!git.tag_exists("v9.9.9").await);
    assert!(git.is_git_repo().await);
}
