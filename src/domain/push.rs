//! Push target resolution.
//!
//! The positional target of `git push` depends on whether the caller named a
//! repository, whether that name is a url, and whether the current branch
//! already tracks an upstream. Argument order is fixed:
//! `--follow-tags`, caller arguments, then the target.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

pub const DEFAULT_REMOTE: &str = "origin";

fn invalid_push_repo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\S+@").expect("valid push repo regex"))
}

/// A remote alias such as `origin`, as opposed to a url
pub fn is_remote_name(remote_name_or_url: &str) -> bool {
    !remote_name_or_url.contains('/')
}

/// Inputs for a push
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PushSpec {
    /// Remote name or url; empty means "not specified"
    pub push_repo: String,
    pub has_upstream_branch: bool,
    pub extra_args: Vec<String>,
}

/// Where a push goes, resolved per invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushTarget {
    /// An explicit url
    Url(String),
    /// Push and start tracking `remote/branch`
    SetUpstream {
        remote: String,
        branch: Option<String>,
    },
    /// A named remote
    Remote(String),
    /// No positional target: git pushes to the configured upstream
    Upstream,
}

impl PushTarget {
    /// Resolve the target for `push_repo`
    ///
    /// For [PushTarget::SetUpstream] the branch is left empty; fill it with
    /// [PushTarget::with_branch] once it has been looked up.
    pub fn resolve(push_repo: &str, has_upstream_branch: bool) -> Self {
        if !push_repo.is_empty() && !is_remote_name(push_repo) {
            PushTarget::Url(push_repo.to_string())
        } else if !has_upstream_branch {
            let remote = if push_repo.is_empty() {
                DEFAULT_REMOTE
            } else {
                push_repo
            };
            PushTarget::SetUpstream {
                remote: remote.to_string(),
                branch: None,
            }
        } else if !invalid_push_repo_re().is_match(push_repo) {
            if push_repo.is_empty() {
                PushTarget::Upstream
            } else {
                PushTarget::Remote(push_repo.to_string())
            }
        } else {
            PushTarget::Remote(DEFAULT_REMOTE.to_string())
        }
    }

    /// Whether the current branch name is part of this target
    pub fn needs_branch(&self) -> bool {
        matches!(self, PushTarget::SetUpstream { .. })
    }

    pub fn with_branch(self, branch: Option<String>) -> Self {
        match self {
            PushTarget::SetUpstream { remote, .. } => PushTarget::SetUpstream { remote, branch },
            other => other,
        }
    }

    /// Positional arguments for `git push`
    pub fn to_args(&self) -> Vec<String> {
        match self {
            PushTarget::Url(target) | PushTarget::Remote(target) => vec![target.clone()],
            PushTarget::SetUpstream { remote, branch } => {
                let mut args = vec!["-u".to_string(), remote.clone()];
                if let Some(branch) = branch {
                    args.push(branch.clone());
                }
                args
            }
            PushTarget::Upstream => Vec::new(),
        }
    }
}

impl fmt::Display for PushTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_args().join(" "))
    }
}
