//! Release workflow orchestration
//!
//! Keeps the release steps apart from argument parsing so the workflow can be
//! driven programmatically (and with a [MockRunner](crate::git::MockRunner)).

use semver::Version;

use crate::config::Config;
use crate::domain::{ChangelogSpec, CommitSpec, PushSpec, StageAllSpec, TagPattern, TagSpec};
use crate::error::{ReleaseGitError, Result};
use crate::git::{CommandRunner, Git, Outcome};
use crate::template;
use crate::ui;
use crate::version::{self, VersionBump};
use crate::warning::OperationWarning;

/// Version used when the repository has no release tag yet
pub const INITIAL_VERSION: Version = Version::new(0, 1, 0);

/// Arguments for the release workflow
///
/// Mirrors the CLI flags without depending on clap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseWorkflowArgs {
    /// Explicit version; wins over `increment`
    pub version: Option<String>,

    /// Increment applied to the latest tagged version (patch by default)
    pub increment: Option<VersionBump>,

    pub no_commit: bool,
    pub no_tag: bool,
    pub no_push: bool,
}

/// Result of a release workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The version that was released
    pub version: String,

    /// The tag that was created, if tagging ran
    pub tag: Option<String>,

    /// Generated changelog, if any
    pub changelog: Option<String>,

    /// Recoverable problems met along the way
    pub warnings: Vec<OperationWarning>,

    /// Whether the push step ran
    pub pushed: bool,
}

/// Determine the version to release
pub fn next_version(
    args: &ReleaseWorkflowArgs,
    latest_version: Option<&str>,
) -> Result<Version> {
    if let Some(explicit) = &args.version {
        return version::parse_version(explicit);
    }
    let bump = args.increment.unwrap_or(VersionBump::Patch);
    match latest_version {
        Some(latest) => match version::parse_version_from_tag(latest) {
            Some(parsed) => Ok(version::bump_version(&parsed, bump)),
            None => Err(ReleaseGitError::version(format!(
                "latest tag '{}' is not a semantic version; pass --version explicitly",
                latest
            ))),
        },
        None => Ok(INITIAL_VERSION),
    }
}

fn collect(warnings: &mut Vec<OperationWarning>, outcome: Outcome) {
    if let Outcome::Warned(warning) = outcome {
        warnings.push(warning);
    }
}

/// Main release workflow
///
/// 1. Check the repository, working dir and upstream
/// 2. Determine the new version
/// 3. Generate the changelog
/// 4. Stage and commit
/// 5. Tag
/// 6. Push
pub async fn run_release_workflow<R: CommandRunner>(
    git: &Git<R>,
    args: &ReleaseWorkflowArgs,
    config: &Config,
) -> Result<WorkflowResult> {
    let cfg = &config.git;

    if !git.is_git_repo().await {
        return Err(ReleaseGitError::NotARepository);
    }
    if cfg.require_clean_working_dir && !git.is_working_dir_clean().await {
        return Err(ReleaseGitError::DirtyWorkingDir);
    }
    let has_upstream = git.has_upstream_branch().await;
    if cfg.require_upstream && !has_upstream {
        return Err(ReleaseGitError::NoUpstream);
    }

    let latest_version = git.latest_tag().await;
    let new_version = next_version(args, latest_version.as_deref())?.to_string();
    ui::display_status(&format!(
        "Releasing {} (latest: {})",
        new_version,
        latest_version.as_deref().unwrap_or("none")
    ));

    let changelog = git
        .changelog(&ChangelogSpec {
            command: cfg.changelog.clone(),
            tag_name: cfg.tag_name.clone(),
            latest_version: latest_version.clone(),
        })
        .await?;

    let vars = template::vars([
        ("version", new_version.clone()),
        ("latestVersion", latest_version.clone().unwrap_or_default()),
    ]);
    let mut warnings = Vec::new();

    if cfg.commit && !args.no_commit {
        let staged = git
            .stage_all(&StageAllSpec {
                add_untracked_files: cfg.add_untracked_files,
                ..StageAllSpec::default()
            })
            .await?;
        collect(&mut warnings, staged);

        let message = template::render(&cfg.commit_message, &vars);
        let committed = git
            .commit(&CommitSpec::new(message.as_str()).with_args(cfg.commit_args.clone()))
            .await?;
        if committed.is_success() {
            ui::display_success(&format!("Committed \"{}\"", message));
        }
        collect(&mut warnings, committed);
    }

    let mut tag = None;
    if cfg.tag && !args.no_tag {
        let name = TagPattern::new(cfg.tag_name.as_str()).format(&new_version);
        let annotation = template::render(&cfg.tag_annotation, &vars);
        let tagged = git
            .tag(&TagSpec::new(name.as_str(), annotation).with_args(cfg.tag_args.clone()))
            .await?;
        if tagged.is_success() {
            ui::display_success(&format!("Tagged {}", name));
        }
        collect(&mut warnings, tagged);
        tag = Some(name);
    }

    let mut pushed = false;
    if cfg.push && !args.no_push {
        git.push(&PushSpec {
            push_repo: cfg.push_repo.clone(),
            has_upstream_branch: has_upstream,
            extra_args: cfg.push_args.clone(),
        })
        .await?;
        ui::display_success("Pushed");
        pushed = true;
    }

    Ok(WorkflowResult {
        version: new_version,
        tag,
        changelog,
        warnings,
        pushed,
    })
}
