use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::snapshot::SNAPSHOT_FILE;

/// Environment variable holding the bearer token for the GitHub API.
pub const ENV_TOKEN: &str = "GITHUB_TOKEN";
/// Environment variable naming the repository whose issues are tracked.
pub const ENV_REPO: &str = "REPO";
/// Environment variable naming the repository hosting the target issue.
/// Falls back to the tracked repository when unset.
pub const ENV_TARGET_REPO: &str = "TARGET_REPO";
/// Environment variable selecting the issue the changelog is posted to.
pub const ENV_TARGET_ISSUE: &str = "TARGET_ISSUE";

/// Issue the changelog is posted to when `TARGET_ISSUE` is unset.
pub const DEFAULT_TARGET_ISSUE: u64 = 1;

/// Configuration errors, all fatal at startup
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("GITHUB_TOKEN environment variable is required")]
    MissingToken,
    #[error("REPO environment variable is required")]
    MissingRepo,
    #[error("TARGET_ISSUE must be a positive issue number, got `{0}`")]
    InvalidTargetIssue(String),
}

/// Runtime configuration, read from the environment once at startup and
/// passed into every component that needs it.
pub struct Config {
    /// Bearer token for the GitHub API. Never logged.
    pub token: String,
    /// Repository whose issues are tracked, `owner/name`.
    pub repo: String,
    /// Repository hosting the target issue.
    pub target_repo: String,
    /// Issue number the changelog comment is posted to.
    pub target_issue: u64,
    /// Snapshot file location.
    pub snapshot_path: PathBuf,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an injected variable lookup.
    ///
    /// Empty values count as missing, so a CI line like `REPO=` cannot
    /// smuggle an empty repository name through validation.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value of a named variable, if set
    ///
    /// # Returns
    /// * `Ok(Config)` with defaults applied for the optional variables
    /// * `Err(ConfigError)` when a required variable is missing or the
    ///   target issue number does not parse
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token = lookup(ENV_TOKEN).ok_or(ConfigError::MissingToken)?;
        let repo = lookup(ENV_REPO).ok_or(ConfigError::MissingRepo)?;
        let target_repo = lookup(ENV_TARGET_REPO).unwrap_or_else(|| repo.clone());
        let target_issue = match lookup(ENV_TARGET_ISSUE) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|number| *number > 0)
                .ok_or(ConfigError::InvalidTargetIssue(raw))?,
            None => DEFAULT_TARGET_ISSUE,
        };

        Ok(Config {
            token,
            repo,
            target_repo,
            target_issue,
            snapshot_path: PathBuf::from(SNAPSHOT_FILE),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"[REDACTED]")
            .field("repo", &self.repo)
            .field("target_repo", &self.target_repo)
            .field("target_issue", &self.target_issue)
            .field("snapshot_path", &self.snapshot_path)
            .finish()
    }
}
