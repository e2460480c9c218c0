use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use release_git::cli::{run_release_workflow, ReleaseWorkflowArgs};
use release_git::config::{self, Config};
use release_git::domain::ChangelogSpec;
use release_git::git::{Git, GitContext, ProcessRunner};
use release_git::ui;
use release_git::version::VersionBump;

#[derive(Parser)]
#[command(
    name = "release-git",
    version,
    about = "Commit, tag and push releases through the git command line"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Log every git command")]
    verbose: bool,

    #[arg(long, global = true, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show repository state
    Info,

    /// Print the changelog since the latest release
    Changelog {
        #[arg(long, help = "Changelog command overriding the configuration")]
        command: Option<String>,
    },

    /// Clone a repository, optionally `url#branch`
    Clone { repo: String, dir: PathBuf },

    /// Stage files
    Stage {
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Restore files to their HEAD content
    Reset {
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Commit, tag and push a new release
    Release {
        #[arg(long, conflicts_with = "increment", help = "Explicit version to release")]
        version: Option<String>,

        #[arg(long, value_enum, help = "Version increment (default: patch)")]
        increment: Option<VersionBump>,

        #[arg(long)]
        no_commit: bool,

        #[arg(long)]
        no_tag: bool,

        #[arg(long)]
        no_push: bool,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(args).await {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config =
        config::load_config(args.config.as_deref()).context("Error loading config")?;
    config.behavior.verbose |= args.verbose;
    config.behavior.dry_run |= args.dry_run;

    let cwd = std::env::current_dir().context("Cannot determine working directory")?;
    let runner = ProcessRunner::new().dry_run(config.behavior.dry_run);
    let git = Git::new(runner, GitContext::new(cwd).verbose(config.behavior.verbose));

    match args.command {
        Command::Info => show_info(&git).await?,
        Command::Changelog { command } => {
            let spec = ChangelogSpec {
                command: command.or_else(|| config.git.changelog.clone()),
                tag_name: config.git.tag_name.clone(),
                latest_version: git.latest_tag().await,
            };
            match git.changelog(&spec).await? {
                Some(changelog) => println!("{}", changelog),
                None => ui::display_status("No changelog generated"),
            }
        }
        Command::Clone { repo, dir } => {
            git.clone_repo(&repo, &dir).await?;
            ui::display_success(&format!("Cloned {} into {}", repo, dir.display()));
        }
        Command::Stage { paths } => {
            if git.stage(&paths).await?.is_success() {
                ui::display_success(&format!("Staged {}", paths.join(", ")));
            }
        }
        Command::Reset { paths } => {
            if git.reset(&paths).await?.is_success() {
                ui::display_success(&format!("Reset {}", paths.join(", ")));
            }
        }
        Command::Release {
            version,
            increment,
            no_commit,
            no_tag,
            no_push,
        } => {
            let workflow_args = ReleaseWorkflowArgs {
                version,
                increment,
                no_commit,
                no_tag,
                no_push,
            };
            release(&git, &workflow_args, &config).await?;
        }
    }

    Ok(())
}

async fn release(
    git: &Git<ProcessRunner>,
    args: &ReleaseWorkflowArgs,
    config: &Config,
) -> Result<()> {
    if config.behavior.dry_run {
        ui::display_status("Dry run: git commands that change the repository are skipped");
    }
    let result = run_release_workflow(git, args, config).await?;

    if let Some(changelog) = &result.changelog {
        ui::display_status("Changelog:");
        println!("{}", changelog);
    }
    let summary = match (&result.tag, result.pushed) {
        (Some(tag), true) => format!("Released {} as {} and pushed", result.version, tag),
        (Some(tag), false) => format!("Released {} as {} (not pushed)", result.version, tag),
        (None, _) => format!("Released {}", result.version),
    };
    ui::display_success(&summary);
    if !result.warnings.is_empty() {
        ui::display_status(&format!("{} warning(s) during release", result.warnings.len()));
    }
    Ok(())
}

async fn show_info(git: &Git<ProcessRunner>) -> Result<()> {
    if !git.is_git_repo().await {
        return Err(release_git::ReleaseGitError::NotARepository.into());
    }

    let root = git.root_dir().await?;
    let branch = git.current_branch_name().await;
    let latest = git.latest_tag_name().await;
    let origin = git.remote_url("origin").await;
    let upstream = git.has_upstream_branch().await;
    let clean = git.is_working_dir_clean().await;

    ui::display_field("root", Some(root.display().to_string().as_str()));
    ui::display_field("branch", branch.as_deref());
    ui::display_field("upstream", Some(if upstream { "yes" } else { "no" }));
    ui::display_field("latest tag", latest.as_deref());
    if let Some(tag) = &latest {
        let count = git.commits_since(tag).await.map(|n| n.to_string());
        ui::display_field("commits", count.as_deref());
    }
    ui::display_field("clean", Some(if clean { "yes" } else { "no" }));
    ui::display_field("origin", origin.as_deref());
    if let Some(repo) = git.repo_ref("origin").await {
        ui::display_field("repository", Some(repo.name.as_str()));
    }

    let status = git.status().await?;
    if !status.is_empty() {
        ui::line_separator();
        println!("{}", status);
    }
    Ok(())
}
