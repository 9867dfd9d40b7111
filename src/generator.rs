use crate::config::Config;
use crate::error::Result;
use crate::github::{CalendarRange, GitHubClient};
use crate::languages::collect_top_languages;
use crate::models::{BadgeStats, ContributionCalendar};
use crate::streak::compute_streaks;
use crate::svg::render_svg;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What a generation run produced
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub svg_path: PathBuf,
    pub json_path: Option<PathBuf>,
    pub stats: BadgeStats,
}

/// Contribution calendar for the configured user: either GitHub's default
/// window, or every contribution year fetched one after another
pub async fn fetch_calendar(
    client: &GitHubClient,
    username: &str,
    all_time: bool,
) -> Result<ContributionCalendar> {
    if !all_time {
        return client.fetch_contribution_calendar(username, None).await;
    }

    let mut years = client.fetch_contribution_years(username).await?;
    years.sort_unstable();
    info!(username, years = ?years, "Fetching all-time contribution calendar");

    // Ranged calendars are padded with zero days up to `to`
    let today = Utc::now().date_naive();
    let ranges = years
        .into_iter()
        .filter_map(CalendarRange::year)
        .filter_map(|range| range.ending_by(today));

    let mut calendar = ContributionCalendar::default();
    for range in ranges {
        let year = client.fetch_contribution_calendar(username, Some(range)).await?;
        debug!(from = %range.from, to = %range.to, total = year.total_contributions, "Fetched contribution year");
        calendar.merge(year);
    }
    calendar.days.retain(|day| day.date <= today);

    Ok(calendar)
}

/// Collect every metric shown on the badge
pub async fn collect_stats(client: &GitHubClient, config: &Config) -> Result<BadgeStats> {
    info!(username = %config.username, "Fetching contribution calendar");
    let calendar = fetch_calendar(client, &config.username, config.all_time).await?;

    let streaks = compute_streaks(&calendar.days);
    info!(
        total_contributions = calendar.total_contributions,
        current_streak = streaks.current_streak,
        longest_streak = streaks.longest_streak,
        "Computed contribution streaks"
    );

    let top_languages = collect_top_languages(
        client,
        &config.username,
        config.max_repos,
        config.top_languages,
    )
    .await?;

    Ok(BadgeStats {
        username: config.username.clone(),
        total_contributions: calendar.total_contributions,
        streaks,
        top_languages,
    })
}

/// Fetch, compute, render and write the badge
pub async fn generate(config: &Config) -> Result<GenerationReport> {
    let client = GitHubClient::with_base_url(config.token.clone(), &config.api_url, config.timeout)?;

    let stats = collect_stats(&client, config).await?;

    write_output(&config.output, &render_svg(&stats))?;
    info!(path = %config.output.display(), "Wrote SVG");

    if let Some(json_path) = &config.json_output {
        write_output(json_path, &serde_json::to_string_pretty(&stats)?)?;
        info!(path = %json_path.display(), "Wrote JSON summary");
    }

    Ok(GenerationReport {
        svg_path: config.output.clone(),
        json_path: config.json_output.clone(),
        stats,
    })
}

/// Write `contents` to `path`, creating parent directories
fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
