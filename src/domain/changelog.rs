use std::sync::OnceLock;

use regex::Regex;

/// Placeholder replaced by the revision range since the latest tag
pub const REV_RANGE: &str = "[REV_RANGE]";

/// The changelog command used when none is configured
pub const DEFAULT_CHANGELOG_COMMAND: &str = "git log --pretty=format:\"* %s (%h)\" [REV_RANGE]";

fn log_command_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^.?git\s+log\b").expect("valid log command regex"))
}

/// Inputs for changelog generation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangelogSpec {
    /// Command to run; `None` or empty disables the changelog
    pub command: Option<String>,
    /// Tag naming pattern used to locate the latest release tag
    pub tag_name: String,
    /// Version of the latest release
    pub latest_version: Option<String>,
}

impl ChangelogSpec {
    pub fn new(command: impl Into<String>, tag_name: impl Into<String>) -> Self {
        ChangelogSpec {
            command: Some(command.into()),
            tag_name: tag_name.into(),
            latest_version: None,
        }
    }

    pub fn with_latest_version(mut self, version: Option<String>) -> Self {
        self.latest_version = version;
        self
    }
}

/// Whether the command is a `git log` invocation
///
/// One leading character (a quote or paren) is tolerated. A bare `log` is not
/// git and is treated like any other command.
pub fn is_log_command(command: &str) -> bool {
    log_command_re().is_match(command.trim_start())
}

/// Substitute the revision range placeholder exactly once
///
/// `since_tag` is the tag the range starts at; `None` means the whole history.
pub fn substitute_rev_range(command: &str, since_tag: Option<&str>) -> String {
    let range = match since_tag {
        Some(tag) => format!("{}...HEAD", tag),
        None => String::new(),
    };
    command.replacen(REV_RANGE, &range, 1)
}
