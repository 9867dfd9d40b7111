use anyhow::Context;
use clap::Parser;
use colored::*;
use github_stats_badge::cli::Cli;
use github_stats_badge::config::Config;
use github_stats_badge::generator::{generate, GenerationReport};
use tracing::error;
use tracing_subscriber::EnvFilter;

async fn run(cli: Cli) -> anyhow::Result<GenerationReport> {
    // Missing credentials abort before any request is made
    let config = Config::from_cli(cli).context("Failed to load configuration")?;

    println!("📡 Generating stats for {}", config.username.bold());

    generate(&config).await.context("Failed to generate stats")
}

#[tokio::main]
async fn main() {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    println!("{}", "GitHub Stats Badge".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());

    match run(cli).await {
        Ok(report) => {
            let streaks = &report.stats.streaks;
            println!("📊 Total contributions: {}", report.stats.total_contributions);
            println!(
                "🔥 Current streak: {} | Longest streak: {}",
                streaks.current_streak, streaks.longest_streak
            );
            for lang in &report.stats.top_languages {
                println!("   {} {}%", lang.language, lang.percentage);
            }
            println!("✅ Wrote SVG to {}", report.svg_path.display());
            if let Some(json_path) = report.json_path {
                println!("✅ Wrote JSON to {}", json_path.display());
            }
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{} {:#}", "❌ Failed to generate stats:".red(), e);
            std::process::exit(1);
        }
    }
}
