//! Checks transport backed by the GitHub REST API.

use async_trait::async_trait;
use checkwait_core::client::ChecksClient;
use checkwait_core::model::CheckRunList;
use thiserror::Error;

/// Failure modes of the GitHub transport. Both abort the poll; the loop
/// never retries.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Connection, TLS, or body-decode failure.
    #[error("check-runs request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("check-runs request returned {status}: {body}")]
    Status {
        /// HTTP status of the response.
        status: reqwest::StatusCode,
        /// Response body, usually a JSON error message from the API.
        body: String,
    },
}

/// GitHub REST client for the check-runs listing endpoint.
pub struct GithubChecks {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GithubChecks {
    /// Builds a transport against `api_url` (e.g. `https://api.github.com`;
    /// GitHub Enterprise hosts differ). Requests are unauthenticated when
    /// `token` is absent.
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("checkwait/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }
}

fn check_runs_url(api_url: &str, owner: &str, repo: &str, git_ref: &str) -> String {
    format!("{api_url}/repos/{owner}/{repo}/commits/{git_ref}/check-runs")
}

#[async_trait]
impl ChecksClient for GithubChecks {
    async fn list_for_ref(
        &self,
        owner: &str,
        repo: &str,
        git_ref: &str,
        check_name: &str,
    ) -> anyhow::Result<CheckRunList> {
        let url = check_runs_url(&self.api_url, owner, repo, git_ref);

        let mut request = self
            .http
            .get(&url)
            .query(&[("check_name", check_name)])
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(GithubError::Request)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::Status { status, body }.into());
        }

        let list = response
            .json::<CheckRunList>()
            .await
            .map_err(GithubError::Request)?;
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_check_runs_url() {
        assert_eq!(
            check_runs_url("https://api.github.com", "testorg", "testrepo", "abcd"),
            "https://api.github.com/repos/testorg/testrepo/commits/abcd/check-runs"
        );
    }

    #[test]
    fn new_strips_trailing_slash() {
        let client = GithubChecks::new("https://ghe.example.com/api/v3/", None).unwrap();
        assert_eq!(client.api_url, "https://ghe.example.com/api/v3");
    }
}
