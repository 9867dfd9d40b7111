use crate::error::Result;
use crate::github::GitHubClient;
use crate::models::LanguageTotal;
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub const DEFAULT_TOP_LANGUAGES: usize = 6;
pub const DEFAULT_MAX_REPOS: usize = 100;

/// Running byte totals per language across repositories
#[derive(Debug, Clone, Default)]
pub struct LanguageTotals {
    bytes: HashMap<String, u64>,
}

impl LanguageTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one repository's language byte map
    pub fn add(&mut self, languages: &HashMap<String, u64>) {
        for (language, bytes) in languages {
            *self.bytes.entry(language.clone()).or_insert(0) += bytes;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn total_bytes(&self) -> u64 {
        self.bytes.values().sum()
    }

    /// Every language, most bytes first
    pub fn ranked(&self) -> Vec<LanguageTotal> {
        // Zero total would divide by zero; percentages come out as 0 instead
        let total = match self.total_bytes() {
            0 => 1,
            n => n,
        };

        let mut ranked: Vec<LanguageTotal> = self
            .bytes
            .iter()
            .map(|(language, &bytes)| LanguageTotal {
                language: language.clone(),
                bytes,
                percentage: percentage(bytes, total),
            })
            .collect();

        ranked.sort_by(|a, b| b.bytes.cmp(&a.bytes).then_with(|| a.language.cmp(&b.language)));
        ranked
    }

    /// The `n` languages with the most bytes
    pub fn top(&self, n: usize) -> Vec<LanguageTotal> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

impl<'a> FromIterator<&'a HashMap<String, u64>> for LanguageTotals {
    fn from_iter<I: IntoIterator<Item = &'a HashMap<String, u64>>>(iter: I) -> Self {
        let mut totals = LanguageTotals::new();
        for languages in iter {
            totals.add(languages);
        }
        totals
    }
}

/// Share of `total` rounded to two decimals, in percent
pub fn percentage(bytes: u64, total: u64) -> f64 {
    (bytes as f64 / total as f64 * 10000.0).round() / 100.0
}

/// Sum language bytes over the first `max_repos` repositories of `username`.
///
/// Repositories are queried one at a time. A repository whose languages cannot
/// be fetched is logged and skipped; failing to list repositories is an error.
pub async fn collect_language_totals(
    client: &GitHubClient,
    username: &str,
    max_repos: usize,
) -> Result<LanguageTotals> {
    let repos = client.list_user_repos(username, max_repos).await?;
    info!(username, repos = repos.len(), "Aggregating repository languages");

    let mut totals = LanguageTotals::new();
    let mut skipped = 0;

    for repo in &repos {
        match client.fetch_repo_languages(username, &repo.name).await {
            Ok(languages) => {
                debug!(repo = %repo.full_name, languages = languages.len(), "Fetched languages");
                totals.add(&languages);
            }
            Err(e) => {
                warn!(repo = %repo.name, error = %e, "Failed to fetch languages, skipping");
                skipped += 1;
            }
        }
    }

    info!(
        languages = totals.len(),
        total_bytes = totals.total_bytes(),
        skipped,
        "Language aggregation finished"
    );

    Ok(totals)
}

/// Top `top_n` languages of `username` by bytes
pub async fn collect_top_languages(
    client: &GitHubClient,
    username: &str,
    max_repos: usize,
    top_n: usize,
) -> Result<Vec<LanguageTotal>> {
    let totals = collect_language_totals(client, username, max_repos).await?;
    Ok(totals.top(top_n))
}
