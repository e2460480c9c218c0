use semver::Version;

use crate::error::{ReleaseGitError, Result};

/// Represents the type of semantic version bump to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

/// Parses a version from a git tag string.
///
/// Removes one leading `v` or `V` and parses the rest as a semantic version,
/// so pre-release and build metadata survive (`v2.0.0-rc.1`).
///
/// # Returns
/// * `Some(Version)` - Successfully parsed version
/// * `None` - If the tag is not a semantic version
///
/// # Example
/// ```
/// use release_git::version::parse_version_from_tag;
/// assert_eq!(parse_version_from_tag("v1.2.3").unwrap().to_string(), "1.2.3");
/// assert!(parse_version_from_tag("1.2").is_none());
/// ```
pub fn parse_version_from_tag(tag: &str) -> Option<Version> {
    let clean_tag = tag
        .strip_prefix('v')
        .or_else(|| tag.strip_prefix('V'))
        .unwrap_or(tag);
    Version::parse(clean_tag).ok()
}

/// Parses an explicit version given by the user.
pub fn parse_version(input: &str) -> Result<Version> {
    parse_version_from_tag(input.trim())
        .ok_or_else(|| ReleaseGitError::version(format!("'{}' is not a semantic version", input)))
}

/// Bumps a version according to the specified bump type.
///
/// Increments the appropriate component and resets lower components to 0:
/// - **Major**: major += 1, minor = 0, patch = 0
/// - **Minor**: minor += 1, patch = 0
/// - **Patch**: patch += 1
///
/// Pre-release and build metadata are dropped.
pub fn bump_version(version: &Version, bump_type: VersionBump) -> Version {
    match bump_type {
        VersionBump::Major => Version::new(version.major + 1, 0, 0),
        VersionBump::Minor => Version::new(version.major, version.minor + 1, 0),
        VersionBump::Patch => Version::new(version.major, version.minor, version.patch + 1),
    }
}
