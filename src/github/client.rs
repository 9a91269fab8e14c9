use crate::error::{GhstatsError, Result};
use crate::model::{CommitRecord, DateWindow, LineStats, Repository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use indicatif::ProgressBar;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const PER_PAGE: usize = 100;

const MIN_RATE_LIMIT_WAIT_SECS: i64 = 60;
const INITIAL_RATE_LIMIT: u64 = 5000;
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Suspends the transport while waiting out an exhausted rate limit.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub remaining: u64,
    pub reset: i64,
}

pub struct GitHubClient {
    http: Client,
    base_url: String,
    rate_limit: Mutex<RateLimitInfo>,
    sleeper: Arc<dyn Sleeper>,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("token {token}"))
            .map_err(|_| GhstatsError::Auth("Invalid GitHub token".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("ghstats/", env!("CARGO_PKG_VERSION"))),
        );

        let http = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limit: Mutex::new(RateLimitInfo {
                remaining: INITIAL_RATE_LIMIT,
                reset: 0,
            }),
            sleeper: Arc::new(TokioSleeper),
        })
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn rate_limit_info(&self) -> RateLimitInfo {
        *self.rate_limit.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Returns the login of the authenticated user.
    pub async fn validate_credential(&self) -> Result<String> {
        let user: ApiUser = self.get("/user", &[]).await?;
        Ok(user.login)
    }

    pub async fn list_repositories(&self, progress: &ProgressBar) -> Result<Vec<Repository>> {
        let mut repos = Vec::new();
        let mut page = 1u32;

        loop {
            let query = [
                ("page", page.to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("sort", "updated".to_string()),
                ("direction", "desc".to_string()),
            ];
            let batch: Vec<Repository> = self.get("/user/repos", &query).await?;
            if batch.is_empty() {
                break;
            }

            let count = batch.len();
            repos.extend(batch);
            progress.set_message(format!("Fetched {} repositories...", repos.len()));
            debug!(page, count, "fetched repository page");

            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(repos)
    }

    /// Lists commits in `window`, each with its line stats when available.
    ///
    /// An empty repository yields no commits. An exhausted rate limit aborts with
    /// [`GhstatsError::RateLimited`]; any other failure keeps the pages already read.
    pub async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        window: &DateWindow,
        branch: Option<&str>,
    ) -> Result<Vec<CommitRecord>> {
        let path = format!("/repos/{owner}/{repo}/commits");
        let mut commits = Vec::new();
        let mut page = 1u32;

        loop {
            let mut query = vec![
                ("since", window.since_param()),
                ("until", window.until_param()),
                ("page", page.to_string()),
                ("per_page", PER_PAGE.to_string()),
            ];
            if let Some(branch) = branch {
                query.push(("sha", branch.to_string()));
            }

            let listed: Vec<ApiCommit> = match self.get(&path, &query).await {
                Ok(listed) => listed,
                Err(GhstatsError::Api { status: 409, .. }) => break,
                Err(e @ GhstatsError::RateLimited { .. }) => return Err(e),
                Err(e) => {
                    debug!(owner, repo, page, error = %e, "commit listing stopped");
                    break;
                }
            };
            if listed.is_empty() {
                break;
            }

            let count = listed.len();
            let detailed = join_all(
                listed
                    .into_iter()
                    .map(|commit| self.commit_with_stats(owner, repo, commit)),
            )
            .await;
            commits.extend(detailed);

            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        Ok(commits)
    }

    async fn commit_with_stats(&self, owner: &str, repo: &str, commit: ApiCommit) -> CommitRecord {
        let path = format!("/repos/{owner}/{repo}/commits/{}", commit.sha);
        let stats = match self.get::<ApiCommitDetail>(&path, &[]).await {
            Ok(detail) => detail.stats,
            Err(e) => {
                debug!(sha = %commit.sha, error = %e, "commit stats unavailable");
                None
            }
        };
        commit.into_record(stats)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let request = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .build()?;
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }

    /// Sends `request`, replaying it once after the reset time if the rate limit
    /// is exhausted.
    async fn send(&self, request: Request) -> Result<Response> {
        let replay = request.try_clone();
        let response = self.http.execute(request).await?;
        self.record_rate_limit(response.headers());

        let response = match replay {
            Some(replay) if is_rate_limited(&response) => {
                let reset = header_i64(response.headers(), RESET_HEADER).unwrap_or(0);
                let wait = rate_limit_wait(reset, Utc::now().timestamp());
                warn!(
                    "GitHub API rate limit reached, waiting {} before retry",
                    humantime::format_duration(wait)
                );
                self.sleeper.sleep(wait).await;

                let response = self.http.execute(replay).await?;
                self.record_rate_limit(response.headers());
                response
            }
            _ => response,
        };

        check_status(response).await
    }

    fn record_rate_limit(&self, headers: &HeaderMap) {
        let remaining = header_i64(headers, REMAINING_HEADER);
        let reset = header_i64(headers, RESET_HEADER);
        if remaining.is_none() && reset.is_none() {
            return;
        }

        let mut state = self.rate_limit.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(remaining) = remaining {
            state.remaining = remaining.max(0) as u64;
        }
        if let Some(reset) = reset {
            state.reset = reset;
        }
    }
}

/// Wait before replaying a rate-limited request: until `reset`, but never
/// less than a minute.
pub fn rate_limit_wait(reset: i64, now: i64) -> Duration {
    Duration::from_secs(MIN_RATE_LIMIT_WAIT_SECS.max(reset.saturating_sub(now)) as u64)
}

fn is_rate_limited(response: &Response) -> bool {
    response.status() == StatusCode::FORBIDDEN
        && header_i64(response.headers(), REMAINING_HEADER) == Some(0)
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(GhstatsError::Auth("Invalid GitHub token".to_string()));
    }
    if is_rate_limited(&response) {
        let reset = header_i64(response.headers(), RESET_HEADER).unwrap_or(0);
        return Err(GhstatsError::RateLimited { reset });
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiMessage>(&body)
        .map(|m| m.message)
        .unwrap_or(body);
    Err(GhstatsError::Api {
        status: status.as_u16(),
        message,
    })
}

#[derive(Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

#[derive(Deserialize)]
struct ApiCommit {
    sha: String,
    commit: ApiCommitData,
}

#[derive(Deserialize)]
struct ApiCommitData {
    author: ApiAuthor,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct ApiAuthor {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    date: DateTime<Utc>,
}

#[derive(Deserialize)]
struct ApiCommitDetail {
    stats: Option<LineStats>,
}

impl ApiCommit {
    fn into_record(self, stats: Option<LineStats>) -> CommitRecord {
        CommitRecord {
            sha: self.sha,
            author_name: self.commit.author.name,
            author_email: self.commit.author.email,
            timestamp: self.commit.author.date,
            message: self.commit.message,
            stats,
        }
    }
}
