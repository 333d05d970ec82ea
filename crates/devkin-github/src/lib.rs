//! GitHub commit source.
//!
//! Lists the commits of a repository through the GitHub REST API and
//! hydrates each one with the file paths it touched. Pagination, token
//! authentication, and retry on transient failures all live here; the
//! scoring engine never sees any of it.

use std::time::Duration;

use devkin_core::{CommitWindow, DevkinError};

const PER_PAGE: usize = 100;
const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// A GitHub repository reference.
///
/// # Examples
///
/// ```
/// use devkin_github::parse_repo_reference;
///
/// let repo = parse_repo_reference("rust-lang/rust").unwrap();
/// assert_eq!(repo.owner, "rust-lang");
/// assert_eq!(repo.name, "rust");
/// assert_eq!(repo.to_string(), "rust-lang/rust");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Parse a repository reference into owner and name.
///
/// Accepts `owner/name`, `github.com/owner/name`, https/http URLs, and
/// `git@github.com:owner/name` SSH remotes, with an optional trailing
/// `.git`.
///
/// # Errors
///
/// Returns [`DevkinError::Config`] if the reference does not resolve to an
/// owner/name pair.
///
/// # Examples
///
/// ```
/// use devkin_github::parse_repo_reference;
///
/// let repo = parse_repo_reference("https://github.com/octocat/hello-world.git").unwrap();
/// assert_eq!(repo.owner, "octocat");
/// assert_eq!(repo.name, "hello-world");
///
/// assert!(parse_repo_reference("not-a-repo").is_err());
/// ```
pub fn parse_repo_reference(reference: &str) -> Result<RepoRef, DevkinError> {
    let trimmed = reference.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let rest = if let Some(ssh) = trimmed.strip_prefix("git@github.com:") {
        ssh
    } else {
        let no_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);
        no_scheme.strip_prefix("github.com/").unwrap_or(no_scheme)
    };

    let mut parts = rest.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => Ok(RepoRef {
            owner: owner.to_string(),
            name: name.to_string(),
        }),
        _ => Err(DevkinError::Config(format!(
            "invalid repository reference '{reference}', expected owner/name or a GitHub URL"
        ))),
    }
}

/// A commit as returned by the list endpoint: enough to identify it and its
/// author, but without file paths (those require a per-commit request).
#[derive(Debug, Clone)]
pub struct CommitSummary {
    /// Full commit SHA.
    pub sha: String,
    /// Commit author email, `"unknown"` when absent.
    pub author: String,
}

/// GitHub client for listing commits and fetching their file lists.
pub struct GitHubClient {
    octocrab: octocrab::Octocrab,
    http: reqwest::Client,
    token: Option<String>,
}

enum RequestFailure {
    /// Worth retrying: transport error, 5xx, or rate limiting.
    Transient(String),
    Fatal(String),
}

impl GitHubClient {
    /// Create a client from an explicit token, the `GITHUB_TOKEN` /
    /// `GH_TOKEN` environment variables, or anonymously (rate-limited by
    /// GitHub).
    ///
    /// # Errors
    ///
    /// Returns [`DevkinError::GitHub`] if the client cannot be built.
    pub fn new(token: Option<&str>) -> Result<Self, DevkinError> {
        let token = token
            .map(str::to_string)
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
            .or_else(|| std::env::var("GH_TOKEN").ok());

        let mut builder = octocrab::Octocrab::builder();
        if let Some(t) = &token {
            builder = builder.personal_token(t.clone());
        }
        let octocrab = builder
            .build()
            .map_err(|e| DevkinError::GitHub(format!("failed to create GitHub client: {e}")))?;

        let http = reqwest::Client::new();

        Ok(Self {
            octocrab,
            http,
            token,
        })
    }

    /// List commits newest-first until `window` is satisfied or history is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`DevkinError::GitHub`] on API errors.
    pub async fn list_commits(
        &self,
        repo: &RepoRef,
        window: CommitWindow,
    ) -> Result<Vec<CommitSummary>, DevkinError> {
        let route = format!("/repos/{}/{}/commits", repo.owner, repo.name);
        let mut commits = Vec::new();
        let mut page: u32 = 1;

        loop {
            let params = serde_json::json!({ "per_page": PER_PAGE, "page": page });
            let batch: serde_json::Value = self
                .octocrab
                .get(&route, Some(&params))
                .await
                .map_err(|e| {
                    DevkinError::GitHub(format!("failed to list commits of {repo}: {e}"))
                })?;

            let items = batch.as_array().ok_or_else(|| {
                DevkinError::GitHub(format!("unexpected commit list response for {repo}"))
            })?;
            if items.is_empty() {
                break;
            }

            for item in items {
                if window.is_full(commits.len()) {
                    return Ok(commits);
                }
                let Some(sha) = item["sha"].as_str() else {
                    continue;
                };
                let author = item["commit"]["author"]["email"]
                    .as_str()
                    .unwrap_or("unknown");
                commits.push(CommitSummary {
                    sha: sha.to_string(),
                    author: author.to_string(),
                });
            }

            if items.len() < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(commits)
    }

    /// Fetch the file paths touched by one commit.
    ///
    /// # Errors
    ///
    /// Returns [`DevkinError::GitHub`] on API errors, after retrying
    /// transient failures.
    pub async fn commit_files(&self, repo: &RepoRef, sha: &str) -> Result<Vec<String>, DevkinError> {
        let url = format!(
            "https://api.github.com/repos/{}/{}/commits/{sha}",
            repo.owner, repo.name
        );
        let detail = self.get_json(&url).await?;

        let files = detail["files"]
            .as_array()
            .map(|files| {
                files
                    .iter()
                    .filter_map(|f| f["filename"].as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(files)
    }

    /// GET a JSON document, retrying transient failures a bounded number of
    /// times with a fixed delay.
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, DevkinError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_get_json(url).await {
                Ok(value) => return Ok(value),
                Err(RequestFailure::Transient(_)) if attempt < MAX_ATTEMPTS => {
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(RequestFailure::Transient(msg)) => {
                    return Err(DevkinError::GitHub(format!(
                        "{msg} (giving up after {attempt} attempts)"
                    )));
                }
                Err(RequestFailure::Fatal(msg)) => return Err(DevkinError::GitHub(msg)),
            }
        }
    }

    async fn try_get_json(&self, url: &str) -> Result<serde_json::Value, RequestFailure> {
        let mut request = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "devkin");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| RequestFailure::Transient(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| RequestFailure::Fatal(format!("invalid response body: {e}")));
        }

        let body = response.text().await.unwrap_or_default();
        let message = format!("GitHub API error {status}: {body}");
        let rate_limited = status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || (status == reqwest::StatusCode::FORBIDDEN && body.contains("rate limit"));
        if status.is_server_error() || rate_limited {
            Err(RequestFailure::Transient(message))
        } else {
            Err(RequestFailure::Fatal(message))
        }
    }
}
