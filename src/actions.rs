// SPDX-License-Identifier: PMPL-1.0-or-later

//! GitHub Actions input/output plumbing.
//!
//! Inputs arrive as `INPUT_*` environment variables, the convention the
//! runner uses to pass an action's `with:` values into its process. Outputs
//! go through the file named by `GITHUB_OUTPUT` so later workflow steps can
//! read them back.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::{Error, Result};

/// Read a named action input. Unset or blank inputs are treated as absent.
pub fn get_input(name: &str) -> Option<String> {
    let key = format!("INPUT_{}", name.to_uppercase().replace([' ', '-'], "_"));
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read an input that must be present.
pub fn required_input(name: &'static str) -> Result<String> {
    get_input(name).ok_or(Error::MissingInput(name))
}

/// Record a job output for later workflow steps.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    let path = env::var("GITHUB_OUTPUT")
        .map_err(|_| Error::Context("GITHUB_OUTPUT is not set".to_string()))?;
    append_output(Path::new(&path), name, value)
}

/// Append one output record to the workflow command file.
pub fn append_output(path: &Path, name: &str, value: &str) -> Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(format_output(name, value).as_bytes())?;
    Ok(())
}

/// Single-line values use `name=value`. Multiline values use the heredoc
/// form with a unique delimiter so embedded newlines survive the round trip.
fn format_output(name: &str, value: &str) -> String {
    if value.contains('\n') {
        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
    } else {
        format!("{name}={value}\n")
    }
}

/// The workflow run this invocation belongs to, used purely for display text.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub owner: String,
    pub repo: String,
    pub ref_name: String,
    pub run_id: String,
    pub server_url: String,
}

impl RunContext {
    /// Build the run context from the runner's standard environment.
    pub fn from_env() -> Result<Self> {
        let repository = env::var("GITHUB_REPOSITORY")
            .map_err(|_| Error::Context("GITHUB_REPOSITORY is not set".to_string()))?;
        let (owner, repo) = repository.split_once('/').ok_or_else(|| {
            Error::Context(format!(
                "GITHUB_REPOSITORY '{}' is not in owner/repo form",
                repository
            ))
        })?;

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            ref_name: env::var("GITHUB_REF_NAME")
                .map_err(|_| Error::Context("GITHUB_REF_NAME is not set".to_string()))?,
            run_id: env::var("GITHUB_RUN_ID")
                .map_err(|_| Error::Context("GITHUB_RUN_ID is not set".to_string()))?,
            server_url: env::var("GITHUB_SERVER_URL")
                .unwrap_or_else(|_| "https://github.com".to_string()),
        })
    }

    /// Link target for the top-level embed author.
    pub fn run_url(&self) -> String {
        format!(
            "{}/{}/{}/actions/runs/{}",
            self.server_url, self.owner, self.repo, self.run_id
        )
    }

    /// Author name shown on the top-level embed.
    pub fn embed_title(&self) -> String {
        format!("{}/{}", self.repo, self.ref_name)
    }

    /// Name given to the notification thread.
    pub fn thread_title(&self) -> String {
        format!("{}/{}:{}", self.repo, self.ref_name, self.run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RunContext {
        RunContext {
            owner: "test-org".to_string(),
            repo: "widget-api".to_string(),
            ref_name: "production".to_string(),
            run_id: "987654".to_string(),
            server_url: "https://github.com".to_string(),
        }
    }

    #[test]
    fn test_run_url_format() {
        assert_eq!(
            context().run_url(),
            "https://github.com/test-org/widget-api/actions/runs/987654"
        );
    }

    #[test]
    fn test_embed_and_thread_titles() {
        assert_eq!(context().embed_title(), "widget-api/production");
        assert_eq!(context().thread_title(), "widget-api/production:987654");
    }

    #[test]
    fn test_get_input_normalizes_name_and_trims() {
        env::set_var("INPUT_HERALDBOT_UNIT_PROBE", "  value  ");
        assert_eq!(
            get_input("heraldbot-unit probe").as_deref(),
            Some("value")
        );
        env::remove_var("INPUT_HERALDBOT_UNIT_PROBE");
    }

    #[test]
    fn test_blank_input_is_absent() {
        env::set_var("INPUT_HERALDBOT_UNIT_BLANK", "   ");
        assert_eq!(get_input("HERALDBOT_UNIT_BLANK"), None);
        env::remove_var("INPUT_HERALDBOT_UNIT_BLANK");
        assert_eq!(get_input("HERALDBOT_UNIT_BLANK"), None);
    }

    #[test]
    fn test_required_input_missing_errors() {
        let err = required_input("HERALDBOT_UNIT_MISSING").unwrap_err();
        assert!(matches!(err, Error::MissingInput("HERALDBOT_UNIT_MISSING")));
    }

    #[test]
    fn test_format_output_single_line() {
        assert_eq!(format_output("DISCORD_THREAD_ID", "222"), "DISCORD_THREAD_ID=222\n");
    }

    #[test]
    fn test_format_output_multiline_uses_heredoc() {
        let formatted = format_output("NOTES", "line one\nline two");
        let mut lines = formatted.lines();
        let header = lines.next().unwrap();
        let delimiter = header
            .strip_prefix("NOTES<<")
            .expect("heredoc header should open with the name");
        assert!(delimiter.starts_with("ghadelimiter_"));
        assert_eq!(lines.next(), Some("line one"));
        assert_eq!(lines.next(), Some("line two"));
        assert_eq!(lines.next(), Some(delimiter));
    }

    #[test]
    fn test_append_output_appends_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");

        append_output(&path, "DISCORD_MESSAGE_ID", "111").unwrap();
        append_output(&path, "DISCORD_THREAD_ID", "222").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "DISCORD_MESSAGE_ID=111\nDISCORD_THREAD_ID=222\n");
    }
}
