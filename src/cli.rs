use crate::github::API_BASE_URL;
use crate::languages::{DEFAULT_MAX_REPOS, DEFAULT_TOP_LANGUAGES};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "github-stats-badge")]
#[command(about = "Renders GitHub contribution streaks and top languages into an SVG badge")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// GitHub account to report on
    #[arg(short, long, env = "GH_STATS_USERNAME", default_value = "Abdelrahman-Fathy-10")]
    pub username: String,

    /// Where to write the SVG (overwritten on every run)
    #[arg(short, long, default_value = "stats/github-stats.svg")]
    pub output: PathBuf,

    /// Also write the computed stats as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// GitHub REST API root; GraphQL is served from `<api-url>/graphql`, or
    /// `/api/graphql` when the root ends in `/api/v3`
    #[arg(long, env = "GITHUB_API_URL", default_value = API_BASE_URL)]
    pub api_url: String,

    /// Number of repositories to scan for languages
    #[arg(long, default_value_t = DEFAULT_MAX_REPOS)]
    pub max_repos: usize,

    /// Number of languages shown on the badge
    #[arg(long, default_value_t = DEFAULT_TOP_LANGUAGES)]
    pub top_languages: usize,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Fetch every contribution year instead of the last twelve months
    #[arg(long)]
    pub all_time: bool,
}
