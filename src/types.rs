use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;

// GitHub API response structures

/// Envelope shared by every GraphQL response
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorMessage {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UserData<T> {
    pub user: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContributions<C> {
    pub contributions_collection: C,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCollection {
    pub contribution_calendar: GitHubCalendar,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearsCollection {
    pub contribution_years: Vec<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubCalendar {
    pub total_contributions: u64,
    pub weeks: Vec<GitHubWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubWeek {
    pub contribution_days: Vec<GitHubContributionDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubContributionDay {
    pub date: NaiveDate,
    pub contribution_count: u32,
}

pub type CalendarData = UserData<UserContributions<CalendarCollection>>;
pub type YearsData = UserData<UserContributions<YearsCollection>>;

#[derive(Debug, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub full_name: String,
}

/// Body of `/repos/{owner}/{repo}/languages`: language name to byte count
pub type RepoLanguages = HashMap<String, u64>;
