#![allow(dead_code)]

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Error a repository's languages endpoint answers with
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    ServerError,
    Unauthorized,
    /// 403 with `X-RateLimit-Remaining: 0`, resetting this many seconds from now
    RateLimited { reset_in_secs: i64 },
}

/// Canned responses served by the fake GitHub API
#[derive(Debug, Clone, Default)]
pub struct FakeGitHub {
    /// Body returned for calendar queries without a date range
    pub calendar: Value,
    /// Bodies for ranged calendar queries, keyed by the year of `from`
    pub yearly_calendars: HashMap<i32, Value>,
    pub years: Vec<i32>,
    pub repos: Vec<String>,
    /// Languages per repository name; repositories without an entry answer 404
    pub languages: HashMap<String, Value>,
    /// Repositories answering 403 without rate-limit headers
    pub forbidden: Vec<String>,
    /// Repositories failing a number of times before answering normally
    pub failures: HashMap<String, (Failure, usize)>,
    /// Languages requests seen per repository
    pub hits: Arc<Mutex<HashMap<String, usize>>>,
}

impl FakeGitHub {
    pub fn with_repo(mut self, name: &str, languages: Value) -> Self {
        self.repos.push(name.to_string());
        self.languages.insert(name.to_string(), languages);
        self
    }

    /// Make `name` answer with `failure` for its first `times` requests
    pub fn failing(mut self, name: &str, failure: Failure, times: usize) -> Self {
        self.failures.insert(name.to_string(), (failure, times));
        self
    }

    pub fn hits(&self, name: &str) -> usize {
        self.hits.lock().unwrap().get(name).copied().unwrap_or(0)
    }
}

/// GraphQL body for a calendar with the given days, grouped into weeks of seven
pub fn calendar_body(total: u64, days: &[(&str, u32)]) -> Value {
    let weeks: Vec<Value> = days
        .chunks(7)
        .map(|week| {
            let days: Vec<Value> = week
                .iter()
                .map(|(date, count)| json!({ "date": date, "contributionCount": count }))
                .collect();
            json!({ "contributionDays": days })
        })
        .collect();

    json!({
        "data": {
            "user": {
                "contributionsCollection": {
                    "contributionCalendar": {
                        "totalContributions": total,
                        "weeks": weeks
                    }
                }
            }
        }
    })
}

async fn graphql(State(fake): State<Arc<FakeGitHub>>, Json(body): Json<Value>) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or_default();

    if query.contains("contributionYears") {
        return Json(json!({
            "data": { "user": { "contributionsCollection": { "contributionYears": fake.years } } }
        }));
    }

    let year = body["variables"]["from"]
        .as_str()
        .and_then(|from| from.get(..4))
        .and_then(|y| y.parse::<i32>().ok());

    match year.and_then(|y| fake.yearly_calendars.get(&y)) {
        Some(calendar) => Json(calendar.clone()),
        None => Json(fake.calendar.clone()),
    }
}

async fn repos(
    State(fake): State<Arc<FakeGitHub>>,
    Path(login): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let per_page: usize = params.get("per_page").and_then(|p| p.parse().ok()).unwrap_or(30);
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);

    let repos: Vec<Value> = fake
        .repos
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .map(|name| json!({ "name": name, "full_name": format!("{}/{}", login, name), "fork": false }))
        .collect();

    Json(Value::Array(repos))
}

async fn languages(
    State(fake): State<Arc<FakeGitHub>>,
    Path((_owner, repo)): Path<(String, String)>,
) -> Response {
    let hit = {
        let mut hits = fake.hits.lock().unwrap();
        let count = hits.entry(repo.clone()).or_insert(0);
        *count += 1;
        *count
    };

    if let Some(&(failure, times)) = fake.failures.get(&repo) {
        if hit <= times {
            return failure_response(failure);
        }
    }

    if fake.forbidden.contains(&repo) {
        return (StatusCode::FORBIDDEN, "Resource not accessible").into_response();
    }

    match fake.languages.get(&repo) {
        Some(languages) => Json(languages.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not Found" }))).into_response(),
    }
}

fn failure_response(failure: Failure) -> Response {
    match failure {
        Failure::ServerError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
        Failure::Unauthorized => {
            (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Bad credentials" }))).into_response()
        }
        Failure::RateLimited { reset_in_secs } => {
            let reset = chrono::Utc::now().timestamp() + reset_in_secs;
            (
                StatusCode::FORBIDDEN,
                [
                    ("x-ratelimit-limit", "5000".to_string()),
                    ("x-ratelimit-remaining", "0".to_string()),
                    ("x-ratelimit-reset", reset.to_string()),
                ],
                Json(json!({ "message": "API rate limit exceeded" })),
            )
                .into_response()
        }
    }
}

/// Serve `fake` on an ephemeral local port and return its base URL
pub async fn spawn_fake_github(fake: FakeGitHub) -> anyhow::Result<String> {
    let app = Router::new()
        .route("/graphql", post(graphql))
        .route("/users/:login/repos", get(repos))
        .route("/repos/:owner/:repo/languages", get(languages))
        .with_state(Arc::new(fake));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("Fake GitHub server stopped: {}", e);
        }
    });

    Ok(format!("http://{}", addr))
}
