mod common;

use common::{spawn_fake_github, FakeGitHub};
use github_stats_badge::github::GitHubClient;
use github_stats_badge::languages::{
    collect_language_totals, collect_top_languages, percentage, LanguageTotals,
};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

fn byte_map(entries: &[(&str, u64)]) -> HashMap<String, u64> {
    entries.iter().map(|(lang, bytes)| (lang.to_string(), *bytes)).collect()
}

#[test]
fn test_sums_bytes_across_repositories() {
    let repos = [byte_map(&[("A", 100)]), byte_map(&[("A", 50), ("B", 50)])];
    let totals: LanguageTotals = repos.iter().collect();

    let ranked = totals.ranked();
    assert_eq!(totals.total_bytes(), 200);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].language, "A");
    assert_eq!(ranked[0].bytes, 150);
    assert_eq!(ranked[0].percentage, 75.0);
    assert_eq!(ranked[1].language, "B");
    assert_eq!(ranked[1].bytes, 50);
    assert_eq!(ranked[1].percentage, 25.0);

    let sum: f64 = ranked.iter().map(|l| l.percentage).sum();
    assert!((sum - 100.0).abs() < 1e-9);
}

#[test]
fn test_percentages_round_to_two_decimals() {
    assert_eq!(percentage(1, 3), 33.33);
    assert_eq!(percentage(2, 3), 66.67);
    assert_eq!(percentage(0, 1), 0.0);
}

#[test]
fn test_full_set_sums_to_100_within_rounding() {
    let repos = [
        byte_map(&[("Rust", 12345), ("Go", 6789), ("C", 1011)]),
        byte_map(&[("Rust", 1213), ("Python", 1415), ("Shell", 16)]),
    ];
    let totals: LanguageTotals = repos.iter().collect();

    let sum: f64 = totals.ranked().iter().map(|l| l.percentage).sum();
    assert!((sum - 100.0).abs() <= 0.05, "sum was {}", sum);
}

#[test]
fn test_top_slice_never_exceeds_six() {
    let repo = byte_map(&[
        ("A", 10), ("B", 20), ("C", 30), ("D", 40), ("E", 50), ("F", 60), ("G", 70), ("H", 80),
    ]);
    let totals: LanguageTotals = [repo].iter().collect();

    let top = totals.top(6);
    assert_eq!(top.len(), 6);
    assert_eq!(top[0].language, "H");
    assert_eq!(top[5].language, "C");

    // The slice covers less than the full set
    let slice_sum: f64 = top.iter().map(|l| l.percentage).sum();
    assert!(slice_sum < 100.0);
}

#[test]
fn test_empty_totals_do_not_divide_by_zero() {
    let totals = LanguageTotals::new();

    assert!(totals.is_empty());
    assert_eq!(totals.total_bytes(), 0);
    assert!(totals.top(6).is_empty());
}

#[test]
fn test_zero_byte_languages_get_zero_percent() {
    let totals: LanguageTotals = [byte_map(&[("Markdown", 0)])].iter().collect();

    let ranked = totals.ranked();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].percentage, 0.0);
}

async fn fake_client(fake: FakeGitHub) -> GitHubClient {
    let base_url = spawn_fake_github(fake).await.expect("Failed to start fake GitHub");
    GitHubClient::with_base_url("test_token".to_string(), &base_url, Duration::from_secs(5))
        .expect("Failed to create client")
}

#[tokio::test]
async fn test_failed_repositories_are_skipped() {
    let mut fake = FakeGitHub::default()
        .with_repo("one", json!({ "A": 100 }))
        .with_repo("two", json!({ "A": 50, "B": 50 }))
        .with_repo("locked", json!({ "C": 1000 }));
    fake.forbidden.push("locked".to_string());
    // Listed but unknown to the languages endpoint
    fake.repos.push("gone".to_string());

    let client = fake_client(fake).await;
    let totals = collect_language_totals(&client, "octocat", 100)
        .await
        .expect("Aggregation should survive per-repository failures");

    assert_eq!(totals.total_bytes(), 200);
    let top = totals.top(6);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].percentage, 75.0);
    assert_eq!(top[1].percentage, 25.0);
}

#[tokio::test]
async fn test_zero_repositories_yield_empty_list() {
    let client = fake_client(FakeGitHub::default()).await;

    let top = collect_top_languages(&client, "octocat", 100, 6).await;
    tokio_test::assert_ok!(&top);
    assert!(top.unwrap().is_empty());
}

#[tokio::test]
async fn test_max_repos_limits_scanned_repositories() {
    let fake = FakeGitHub::default()
        .with_repo("first", json!({ "Rust": 10 }))
        .with_repo("second", json!({ "Go": 90 }));
    let client = fake_client(fake).await;

    let top = collect_top_languages(&client, "octocat", 1, 6)
        .await
        .expect("Failed to collect languages");

    assert_eq!(top.len(), 1);
    assert_eq!(top[0].language, "Rust");
    assert_eq!(top[0].percentage, 100.0);
}
