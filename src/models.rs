use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of the contribution calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub count: u32,
}

impl ContributionDay {
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self { date, count }
    }
}

/// Daily series plus the total GitHub reports for it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributionCalendar {
    pub total_contributions: u64,
    pub days: Vec<ContributionDay>,
}

impl ContributionCalendar {
    /// Appends another calendar, e.g. a different contribution year
    pub fn merge(&mut self, other: ContributionCalendar) {
        self.total_contributions += other.total_contributions;
        self.days.extend(other.days);
    }
}

/// Streak metrics derived from a contribution series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    pub total_days: usize,
    pub longest_streak: usize,
    pub longest_streak_start: Option<NaiveDate>,
    pub longest_streak_end: Option<NaiveDate>,
    pub current_streak: usize,
}

/// Bytes attributed to one language across all repositories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageTotal {
    pub language: String,
    pub bytes: u64,
    pub percentage: f64,
}

/// Everything the badge shows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BadgeStats {
    pub username: String,
    pub total_contributions: u64,
    pub streaks: StreakResult,
    pub top_languages: Vec<LanguageTotal>,
}

/// Rate limit state reported by the last REST response
#[derive(Debug, Clone)]
pub struct RateLimitState {
    pub remaining: u32,
    pub limit: u32,
    pub reset_time: chrono::DateTime<chrono::Utc>,
    pub is_limited: bool,
}
