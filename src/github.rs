use crate::error::{Result, StatsError};
use crate::models::{ContributionCalendar, ContributionDay, RateLimitState};
use crate::types::{
    CalendarData, GitHubRepo, GraphQlResponse, RepoLanguages, UserData, YearsData,
};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::str::FromStr;
use std::time::{Duration, SystemTime};
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

pub const API_BASE_URL: &str = "https://api.github.com";
const PER_PAGE: usize = 100;
const MAX_RETRIES: u32 = 3;

const CALENDAR_QUERY: &str = r#"
query ($login: String!, $from: DateTime, $to: DateTime) {
  user(login: $login) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            date
            contributionCount
          }
        }
      }
    }
  }
}
"#;

const YEARS_QUERY: &str = r#"
query ($login: String!) {
  user(login: $login) {
    contributionsCollection {
      contributionYears
    }
  }
}
"#;

/// Inclusive date window for a contribution calendar query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl CalendarRange {
    /// Jan 1 through Dec 31 of `year`
    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            from: NaiveDate::from_ymd_opt(year, 1, 1)?,
            to: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    /// Window cut off at `today`; `None` when it starts after `today`
    pub fn ending_by(self, today: NaiveDate) -> Option<Self> {
        if self.from > today {
            return None;
        }
        Some(Self { from: self.from, to: self.to.min(today) })
    }

    fn bounds(&self) -> (String, String) {
        (
            format!("{}T00:00:00Z", self.from.format("%Y-%m-%d")),
            format!("{}T23:59:59Z", self.to.format("%Y-%m-%d")),
        )
    }
}

pub struct GitHubClient {
    client: Client,
    token: String,
    base_url: Url,
    graphql_url: Url,
    retry_delay: Duration,
}

impl GitHubClient {
    pub fn new(token: String) -> Result<Self> {
        Self::with_base_url(token, API_BASE_URL, Duration::from_secs(30))
    }

    /// Client against a custom API root (GitHub Enterprise, local fakes)
    pub fn with_base_url(token: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("github-stats-badge/0.1.0")
            .timeout(timeout)
            .build()?;

        // Url::join drops the last path segment unless the base ends in '/'
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        // GitHub Enterprise serves REST under /api/v3 but GraphQL at /api/graphql
        let graphql_url = if base.path().ends_with("/api/v3/") {
            base.join("../graphql")?
        } else {
            base.join("graphql")?
        };

        Ok(GitHubClient {
            client,
            token,
            base_url: base,
            graphql_url,
            retry_delay: Duration::from_secs(2),
        })
    }

    /// Pause between retries of a failed request
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn graphql_url(&self) -> &Url {
        &self.graphql_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn make_request(&self, request: RequestBuilder) -> Result<Response> {
        let mut retries = 0;

        loop {
            let attempt = request
                .try_clone()
                .ok_or_else(|| StatsError::ApiError("Request body cannot be retried".to_string()))?;

            let response = attempt
                .header("Accept", "application/vnd.github.v3+json")
                .header("Authorization", format!("token {}", self.token))
                .send()
                .await?;

            let rate_limit = self.get_rate_limit_state(&response);
            let url = response.url().to_string();

            match response.status() {
                reqwest::StatusCode::OK => {
                    if rate_limit.remaining < 10 {
                        warn!(remaining = rate_limit.remaining, "Rate limit low, adding delay");
                        sleep(Duration::from_secs(1)).await;
                    }
                    return Ok(response);
                }
                reqwest::StatusCode::NOT_FOUND => {
                    return Err(StatsError::NotFound(format!("Resource not found: {}", url)));
                }
                reqwest::StatusCode::UNAUTHORIZED => {
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(StatsError::AuthError(format!("Bad credentials: {}", error_text)));
                }
                reqwest::StatusCode::FORBIDDEN | reqwest::StatusCode::TOO_MANY_REQUESTS
                    if rate_limit.is_limited =>
                {
                    let reset_time = SystemTime::UNIX_EPOCH
                        + Duration::from_secs(rate_limit.reset_time.timestamp().max(0) as u64);
                    let wait_time = reset_time
                        .duration_since(SystemTime::now())
                        .unwrap_or(Duration::from_secs(0));

                    if wait_time > Duration::from_secs(60) || retries >= MAX_RETRIES {
                        return Err(StatsError::RateLimitExceeded(format!(
                            "API rate limit exceeded. Reset at: {}",
                            rate_limit.reset_time
                        )));
                    }

                    warn!(wait_seconds = wait_time.as_secs() + 1, "Rate limit reached, waiting");
                    sleep(wait_time + Duration::from_secs(1)).await;
                    retries += 1;
                }
                reqwest::StatusCode::FORBIDDEN => {
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(StatsError::ApiError(format!("Forbidden: {}", error_text)));
                }
                status if status.is_server_error() && retries < MAX_RETRIES => {
                    warn!(%status, %url, retry = retries + 1, "Server error, retrying");
                    sleep(self.retry_delay).await;
                    retries += 1;
                }
                status => {
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(StatsError::ApiError(format!(
                        "API request failed with status {}: {}",
                        status, error_text
                    )));
                }
            }
        }
    }

    /// Rate limit state from the headers of a response
    pub fn get_rate_limit_state(&self, response: &Response) -> RateLimitState {
        let headers = response.headers();
        let header = |name: &str| headers.get(name).and_then(|h| h.to_str().ok());

        let limit = header("X-RateLimit-Limit")
            .and_then(|s| u32::from_str(s).ok())
            .unwrap_or(5000);

        let remaining = header("X-RateLimit-Remaining").and_then(|s| u32::from_str(s).ok());

        let reset = header("X-RateLimit-Reset")
            .and_then(|s| i64::from_str(s).ok())
            .map(|timestamp| DateTime::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now))
            .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

        RateLimitState {
            remaining: remaining.unwrap_or(limit),
            limit,
            reset_time: reset,
            is_limited: remaining == Some(0),
        }
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let request = self
            .client
            .post(self.graphql_url.clone())
            .json(&json!({ "query": query, "variables": variables }));

        let response = self.make_request(request).await?;
        let body: GraphQlResponse<T> = response.json().await?;

        if !body.errors.is_empty() {
            let messages: Vec<String> = body.errors.into_iter().map(|e| e.message).collect();
            return Err(StatsError::GraphQlError(messages.join("; ")));
        }

        body.data
            .ok_or_else(|| StatsError::GraphQlError("Response contained no data".to_string()))
    }

    /// Contribution calendar for `login`, over `range` or GitHub's default last year
    pub async fn fetch_contribution_calendar(
        &self,
        login: &str,
        range: Option<CalendarRange>,
    ) -> Result<ContributionCalendar> {
        let (from, to) = match range.map(|r| r.bounds()) {
            Some((from, to)) => (Some(from), Some(to)),
            None => (None, None),
        };

        let data: CalendarData = self
            .graphql(CALENDAR_QUERY, json!({ "login": login, "from": from, "to": to }))
            .await?;

        let calendar = user_or_not_found(data, login)?
            .contributions_collection
            .contribution_calendar;

        let days: Vec<ContributionDay> = calendar
            .weeks
            .into_iter()
            .flat_map(|week| week.contribution_days)
            .map(|day| ContributionDay::new(day.date, day.contribution_count))
            .collect();

        debug!(
            login,
            days = days.len(),
            total = calendar.total_contributions,
            "Fetched contribution calendar"
        );

        Ok(ContributionCalendar {
            total_contributions: calendar.total_contributions,
            days,
        })
    }

    /// Years in which `login` has contributions, as GitHub reports them (newest first)
    pub async fn fetch_contribution_years(&self, login: &str) -> Result<Vec<i32>> {
        let data: YearsData = self.graphql(YEARS_QUERY, json!({ "login": login })).await?;
        Ok(user_or_not_found(data, login)?
            .contributions_collection
            .contribution_years)
    }

    /// Fetch a page of repositories owned by `login`
    pub async fn fetch_user_repos_page(
        &self,
        login: &str,
        page: u32,
    ) -> Result<(Vec<GitHubRepo>, bool)> {
        let mut url = self.endpoint(&format!("users/{}/repos", login))?;
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("page", &page.to_string());

        let response = self.make_request(self.client.get(url)).await?;
        let repos: Vec<GitHubRepo> = response.json().await?;
        let has_more = repos.len() == PER_PAGE;

        Ok((repos, has_more))
    }

    /// First `max_repos` repositories owned by `login`
    pub async fn list_user_repos(&self, login: &str, max_repos: usize) -> Result<Vec<GitHubRepo>> {
        let mut repos = Vec::new();
        let mut page = 1;

        while repos.len() < max_repos {
            let (batch, has_more) = self.fetch_user_repos_page(login, page).await?;
            debug!(login, page, count = batch.len(), "Fetched repository page");
            repos.extend(batch);

            if !has_more {
                break;
            }
            page += 1;
        }

        repos.truncate(max_repos);
        Ok(repos)
    }

    pub async fn fetch_repo_languages(&self, owner: &str, repo: &str) -> Result<RepoLanguages> {
        let url = self.endpoint(&format!("repos/{}/{}/languages", owner, repo))?;
        let response = self.make_request(self.client.get(url)).await?;
        Ok(response.json().await?)
    }
}

fn user_or_not_found<T>(data: UserData<T>, login: &str) -> Result<T> {
    data.user
        .ok_or_else(|| StatsError::NotFound(format!("GitHub user not found: {}", login)))
}
