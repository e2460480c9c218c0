use std::sync::OnceLock;

use regex::Regex;

fn repo_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // https://host/owner/project.git, ssh://git@host:22/owner/project, git@host:owner/project.git
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:[a-z][a-z0-9+.-]*://)?(?:[^@/]+@)?(?P<host>[^/:]+)(?::\d+)?[:/](?P<path>.+?)(?:\.git)?/?$",
        )
        .expect("valid repository url regex")
    })
}

/// Identifies a repository across release targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// `owner/project` path of the repository
    pub name: String,
    /// The url the reference was parsed from
    pub url: String,
}

impl RepoRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        RepoRef {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Parse a remote url into a reference
    ///
    /// Returns `None` for strings that do not look like a repository url.
    pub fn from_url(url: &str) -> Option<Self> {
        let caps = repo_url_re().captures(url.trim())?;
        let name = caps.name("path")?.as_str().trim_start_matches('/');
        if name.is_empty() {
            return None;
        }
        Some(RepoRef::new(name, url.trim()))
    }

    /// Host part of the url, if it has one
    pub fn host(&self) -> Option<&str> {
        repo_url_re()
            .captures(&self.url)
            .and_then(|caps| caps.name("host"))
            .map(|m| m.as_str())
    }

    /// Same repository iff name and host match exactly
    pub fn is_same_repo(&self, other: &RepoRef) -> bool {
        self.name == other.name && self.host() == other.host()
    }
}
