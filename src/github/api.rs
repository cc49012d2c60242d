use std::fmt;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::github::issues::StateFilter;

mod endpoints {
    pub const API_BASE: &str = "https://api.github.com";

    pub fn issues(repo: &str) -> String {
        format!("{API_BASE}/repos/{repo}/issues")
    }

    pub fn issue(repo: &str, number: u64) -> String {
        format!("{API_BASE}/repos/{repo}/issues/{number}")
    }

    pub fn comments(repo: &str, number: u64) -> String {
        format!("{API_BASE}/repos/{repo}/issues/{number}/comments")
    }
}

const ACCEPT: &str = "application/vnd.github+json";
const USER_AGENT: &str = "issuelog";

/// Issue-tracker operations the run loop depends on.
///
/// Only these three calls touch the network; tests substitute an in-memory
/// implementation so the whole pipeline can execute without it.
#[allow(async_fn_in_trait)]
pub trait IssueApi {
    /// One page of the repository's issue listing, as raw API items.
    async fn list_issues(
        &self,
        repo: &str,
        state: StateFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>>;

    /// Metadata of a single issue.
    async fn get_issue(&self, repo: &str, number: u64) -> Result<Value>;

    /// Post a comment on an issue.
    async fn create_comment(&self, repo: &str, number: u64, body: &str) -> Result<()>;
}

/// GitHub REST implementation of [`IssueApi`].
///
/// Holds the bearer token for the whole run; the token never leaves this
/// struct through Debug output or error messages.
pub struct GithubClient {
    http: reqwest::Client,
    token: String,
}

impl GithubClient {
    pub fn new(token: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(GithubClient { http, token })
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .post(url)
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
    }
}

impl IssueApi for GithubClient {
    async fn list_issues(
        &self,
        repo: &str,
        state: StateFilter,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        let page = page.to_string();
        let per_page = per_page.to_string();
        let response = self
            .get(&endpoints::issues(repo))
            .query(&[
                ("state", state.as_str()),
                ("page", page.as_str()),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Failed to list issues for {repo}: HTTP {}",
                response.status()
            ));
        }

        let items = response.json::<Vec<Value>>().await?;
        Ok(items)
    }

    async fn get_issue(&self, repo: &str, number: u64) -> Result<Value> {
        let response = self.get(&endpoints::issue(repo, number)).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Failed to fetch issue #{number} from {repo}: HTTP {}",
                response.status()
            ));
        }

        let issue = response.json::<Value>().await?;
        Ok(issue)
    }

    async fn create_comment(&self, repo: &str, number: u64, body: &str) -> Result<()> {
        let response = self
            .post(&endpoints::comments(repo, number))
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Failed to post comment on issue #{number} in {repo}: HTTP {}",
                response.status()
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for GithubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubClient").finish()
    }
}
