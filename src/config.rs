use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::changelog::DEFAULT_CHANGELOG_COMMAND;
use crate::error::{ReleaseGitError, Result};

/// File name looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "release-git.toml";

/// File name looked up in the user config directory
pub const USER_CONFIG_FILE_NAME: &str = ".release-git.toml";

/// Represents the complete configuration for release-git.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_changelog() -> Option<String> {
    Some(DEFAULT_CHANGELOG_COMMAND.to_string())
}

fn default_true() -> bool {
    true
}

fn default_commit_message() -> String {
    "Release ${version}".to_string()
}

fn default_tag_name() -> String {
    "v${version}".to_string()
}

fn default_tag_annotation() -> String {
    "Release ${version}".to_string()
}

/// Settings for the git steps of a release.
///
/// Message, tag name and annotation are templates rendered with `${version}`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    /// Changelog command; an empty string disables the changelog
    #[serde(default = "default_changelog")]
    pub changelog: Option<String>,

    #[serde(default = "default_true")]
    pub require_clean_working_dir: bool,

    #[serde(default)]
    pub require_upstream: bool,

    #[serde(default)]
    pub add_untracked_files: bool,

    #[serde(default = "default_true")]
    pub commit: bool,

    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default)]
    pub commit_args: Vec<String>,

    #[serde(default = "default_true")]
    pub tag: bool,

    #[serde(default = "default_tag_name")]
    pub tag_name: String,

    #[serde(default = "default_tag_annotation")]
    pub tag_annotation: String,

    #[serde(default)]
    pub tag_args: Vec<String>,

    #[serde(default = "default_true")]
    pub push: bool,

    /// Remote name or url; empty means the upstream (or "origin")
    #[serde(default)]
    pub push_repo: String,

    #[serde(default)]
    pub push_args: Vec<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            changelog: default_changelog(),
            require_clean_working_dir: true,
            require_upstream: false,
            add_untracked_files: false,
            commit: true,
            commit_message: default_commit_message(),
            commit_args: Vec::new(),
            tag: true,
            tag_name: default_tag_name(),
            tag_annotation: default_tag_annotation(),
            tag_args: Vec::new(),
            push: true,
            push_repo: String::new(),
            push_args: Vec::new(),
        }
    }
}

/// Runtime behavior, overridable from the command line.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub dry_run: bool,
}

/// Path of the configuration file that [load_config] would read
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `release-git.toml` in current directory
/// 3. `.release-git.toml` in the user config directory
pub fn find_config_file(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }
    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join(USER_CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = match find_config_file(config_path) {
        Some(path) => path,
        None => return Ok(Config::default()),
    };
    log::debug!("loading configuration from {}", path.display());

    let config_str = fs::read_to_string(&path)?;
    parse_config(&config_str)
        .map_err(|e| ReleaseGitError::config(format!("{}: {}", path.display(), e)))
}

/// Parses configuration from TOML text
pub fn parse_config(config_str: &str) -> std::result::Result<Config, toml::de::Error> {
    toml::from_str(config_str)
}
