//! Changelog generation from commit history.

use crate::domain::changelog::{is_log_command, substitute_rev_range, REV_RANGE};
use crate::domain::{ChangelogSpec, TagPattern};
use crate::error::Result;
use crate::git::{CommandRunner, FailurePolicy, FatalKind, Git, Invocation, RunOptions};
use crate::template;
use crate::ui;

impl<R: CommandRunner> Git<R> {
    /// Run the configured changelog command
    ///
    /// Returns `Ok(None)` when no command is configured or when the context
    /// directory is not the repository root.
    pub async fn changelog(&self, spec: &ChangelogSpec) -> Result<Option<String>> {
        let command = match spec.command.as_deref().map(str::trim) {
            Some(command) if !command.is_empty() => command,
            _ => return Ok(None),
        };
        if !self.is_at_repo_root().await? {
            log::debug!("not at repository root, skipping changelog");
            return Ok(None);
        }

        let latest_tag = spec
            .latest_version
            .as_deref()
            .map(|version| TagPattern::new(spec.tag_name.as_str()).format(version));

        let resolved = if command.contains(REV_RANGE) {
            let mut since = None;
            if let Some(tag) = latest_tag.as_deref() {
                if self.tag_exists(tag).await {
                    since = Some(tag);
                }
            }
            substitute_rev_range(command, since)
        } else if is_log_command(command) {
            command.to_string()
        } else {
            let vars = template::vars([
                ("latestVersion", spec.latest_version.clone().unwrap_or_default()),
                ("latestTag", latest_tag.clone().unwrap_or_default()),
            ]);
            template::render(command, &vars)
        };

        let outcome = self
            .exec(
                Invocation::shell(resolved.as_str()).in_dir(&self.context().cwd),
                RunOptions::read_only(),
                FailurePolicy::Fatal(FatalKind::Changelog {
                    command: command.to_string(),
                }),
            )
            .await?;

        if self.context().verbose {
            ui::line_separator();
        }
        Ok(outcome.into_output())
    }
}
