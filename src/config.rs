use crate::cli::Cli;
use crate::error::{Result, StatsError};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variables checked for a token, in order
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "PERSONAL_TOKEN"];

/// Settings for one generation run
#[derive(Debug, Clone)]
pub struct Config {
    pub username: String,
    pub token: String,
    pub output: PathBuf,
    pub json_output: Option<PathBuf>,
    pub api_url: String,
    pub max_repos: usize,
    pub top_languages: usize,
    pub timeout: Duration,
    pub all_time: bool,
}

impl Config {
    /// Build from parsed arguments, reading the token from the process environment
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let token = resolve_token(|name| std::env::var(name).ok())?;
        Ok(Self::with_token(cli, token))
    }

    pub fn with_token(cli: Cli, token: String) -> Self {
        Config {
            username: cli.username,
            token,
            output: cli.output,
            json_output: cli.json,
            api_url: cli.api_url,
            max_repos: cli.max_repos,
            top_languages: cli.top_languages,
            timeout: Duration::from_secs(cli.timeout),
            all_time: cli.all_time,
        }
    }
}

/// First non-empty value among `TOKEN_ENV_VARS`
pub fn resolve_token<F>(lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    TOKEN_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            StatsError::AuthError(format!(
                "No token found in {}",
                TOKEN_ENV_VARS.join(" or ")
            ))
        })
}
