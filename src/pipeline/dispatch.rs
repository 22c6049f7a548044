// src/pipeline/dispatch.rs

//! Check-and-deliver dispatch.
//!
//! One run: fan out fetches across sources under a bounded concurrency
//! limit, then walk the results sequentially — check the seen set,
//! deliver, mark. The seen record is persisted exactly once at the end
//! of the run; a persist failure is logged, not raised, since the
//! worst case is redelivery on the next invocation.

use futures::stream::{self, StreamExt};

use crate::error::{FetchError, Result};
use crate::models::{DeliveryOutcome, Post, RunSummary, SourceEntry};
use crate::services::{Deliver, Fetch};
use crate::storage::SeenFile;

/// Run one check-and-deliver pass over all sources.
///
/// A fetch failure for one source never aborts the run. A delivery
/// failure leaves the URL unmarked so the next run retries it.
pub async fn run_once<F: Fetch, D: Deliver>(
    fetcher: &F,
    delivery: &D,
    seen_file: &SeenFile,
    sources: &[SourceEntry],
    max_concurrent: usize,
) -> Result<RunSummary> {
    let mut record = seen_file.load().await?;
    let mut summary = RunSummary::default();

    log::info!("checking {} sources...", sources.len());

    // Stage 1: fetch all sources concurrently, bounded.
    let results: Vec<(&SourceEntry, std::result::Result<Post, FetchError>)> =
        stream::iter(sources)
            .map(|source| async move { (source, fetcher.fetch(source).await) })
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await;

    // Stage 2: check-then-deliver per identity, sequentially. Each
    // identity owns a disjoint key in the record, so ordering across
    // identities is irrelevant; within one identity this is the whole
    // fetch-then-deliver sequence.
    for (source, result) in results {
        match result {
            Err(err) => {
                log::warn!("fetch failed for {}: {}", source.identity, err);
                summary.record(&source.identity, DeliveryOutcome::SkippedError);
            }
            Ok(post) => {
                if record.is_seen(&post.identity, &post.url) {
                    log::info!("already delivered for {}: {}", post.identity, post.url);
                    summary.record(&post.identity, DeliveryOutcome::SkippedDuplicate);
                    continue;
                }

                let outcome = delivery.deliver(&post).await;
                if outcome == DeliveryOutcome::Sent {
                    record.mark(&post.identity, &post.url);
                    log::info!("delivered new post for {}: {}", post.identity, post.url);
                }
                summary.record(&post.identity, outcome);
            }
        }
    }

    // Exactly one persist per run; stale state only means duplicate
    // delivery next run, never data loss.
    if let Err(err) = seen_file.persist(&record).await {
        log::error!("failed to persist seen set: {}", err);
    }

    log::info!(
        "run complete: {} sent, {} duplicates skipped, {} errors",
        summary.sent,
        summary.skipped_duplicate,
        summary.errors
    );

    Ok(summary)
}

/// Fetch the latest post for every source without delivering or
/// touching the seen set. Results come back in source order.
pub async fn run_latest<F: Fetch>(
    fetcher: &F,
    sources: &[SourceEntry],
    max_concurrent: usize,
) -> Vec<(String, std::result::Result<Post, FetchError>)> {
    stream::iter(sources)
        .map(|source| async move {
            (source.identity.clone(), fetcher.fetch(source).await)
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::models::{Platform, SeenMode, SourceKind};

    struct FakeFetcher {
        posts: HashMap<String, Post>,
    }

    impl FakeFetcher {
        fn with_post(identity: &str, url: &str) -> Self {
            let mut posts = HashMap::new();
            posts.insert(identity.to_string(), make_post(identity, url));
            Self { posts }
        }
    }

    #[async_trait]
    impl Fetch for FakeFetcher {
        async fn fetch(&self, source: &SourceEntry) -> std::result::Result<Post, FetchError> {
            self.posts
                .get(&source.identity)
                .cloned()
                .ok_or(FetchError::AllInstancesFailed)
        }
    }

    struct FakeDeliverer {
        outcome: DeliveryOutcome,
        calls: AtomicUsize,
    }

    impl FakeDeliverer {
        fn new(outcome: DeliveryOutcome) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Deliver for FakeDeliverer {
        async fn deliver(&self, _post: &Post) -> DeliveryOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome
        }
    }

    fn make_post(identity: &str, url: &str) -> Post {
        Post {
            identity: identity.to_string(),
            title: "title".to_string(),
            text: "text".to_string(),
            url: url.to_string(),
            author: "author".to_string(),
            published: None,
            media: Vec::new(),
            source: Platform::Reddit,
        }
    }

    fn make_sources(identities: &[&str]) -> Vec<SourceEntry> {
        identities
            .iter()
            .map(|identity| SourceEntry {
                identity: identity.to_string(),
                kind: SourceKind::Subreddit,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_new_post_is_sent_and_recorded() {
        let tmp = TempDir::new().unwrap();
        let seen_file = SeenFile::new(tmp.path().join("seen.json"), SeenMode::Latest);
        let fetcher = FakeFetcher::with_post("conspiracy", "https://r/conspiracy/abc");
        let delivery = FakeDeliverer::new(DeliveryOutcome::Sent);
        let sources = make_sources(&["conspiracy"]);

        let summary = run_once(&fetcher, &delivery, &seen_file, &sources, 4)
            .await
            .unwrap();

        assert_eq!(summary.sent, 1);
        assert_eq!(delivery.call_count(), 1);

        let record = seen_file.load().await.unwrap();
        assert!(record.is_seen("conspiracy", "https://r/conspiracy/abc"));
    }

    #[tokio::test]
    async fn test_seen_post_skipped_without_delivery() {
        let tmp = TempDir::new().unwrap();
        let seen_file = SeenFile::new(tmp.path().join("seen.json"), SeenMode::Latest);

        let mut record = seen_file.load().await.unwrap();
        record.mark("conspiracy", "https://r/conspiracy/abc");
        seen_file.persist(&record).await.unwrap();

        let fetcher = FakeFetcher::with_post("conspiracy", "https://r/conspiracy/abc");
        let delivery = FakeDeliverer::new(DeliveryOutcome::Sent);
        let sources = make_sources(&["conspiracy"]);

        let summary = run_once(&fetcher, &delivery, &seen_file, &sources, 4)
            .await
            .unwrap();

        assert_eq!(summary.sent, 0);
        assert_eq!(summary.skipped_duplicate, 1);
        assert_eq!(delivery.call_count(), 0, "no POST for a duplicate");
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let seen_file = SeenFile::new(tmp.path().join("seen.json"), SeenMode::Latest);
        let fetcher = FakeFetcher::with_post("conspiracy", "https://r/conspiracy/abc");
        let sources = make_sources(&["conspiracy"]);

        let first = FakeDeliverer::new(DeliveryOutcome::Sent);
        run_once(&fetcher, &first, &seen_file, &sources, 4)
            .await
            .unwrap();

        let second = FakeDeliverer::new(DeliveryOutcome::Sent);
        let summary = run_once(&fetcher, &second, &seen_file, &sources, 4)
            .await
            .unwrap();

        assert_eq!(summary.sent, 0);
        assert_eq!(summary.skipped_duplicate, 1);
        assert_eq!(second.call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_delivery_not_marked_and_retried() {
        let tmp = TempDir::new().unwrap();
        let seen_file = SeenFile::new(tmp.path().join("seen.json"), SeenMode::Latest);
        let fetcher = FakeFetcher::with_post("conspiracy", "https://r/conspiracy/abc");
        let sources = make_sources(&["conspiracy"]);

        let failing = FakeDeliverer::new(DeliveryOutcome::FailedHttp(500));
        let summary = run_once(&fetcher, &failing, &seen_file, &sources, 4)
            .await
            .unwrap();

        assert_eq!(summary.sent, 0);
        assert_eq!(summary.errors, 1);
        let record = seen_file.load().await.unwrap();
        assert!(
            !record.is_seen("conspiracy", "https://r/conspiracy/abc"),
            "failed delivery must not mark the URL seen"
        );

        // Retry-by-omission: next run delivers the same URL.
        let working = FakeDeliverer::new(DeliveryOutcome::Sent);
        let summary = run_once(&fetcher, &working, &seen_file, &sources, 4)
            .await
            .unwrap();
        assert_eq!(summary.sent, 1);
        assert_eq!(working.call_count(), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_counted_and_run_continues() {
        let tmp = TempDir::new().unwrap();
        let seen_file = SeenFile::new(tmp.path().join("seen.json"), SeenMode::Latest);
        // Only one of two sources resolves; the other errors.
        let fetcher = FakeFetcher::with_post("conspiracy", "https://r/conspiracy/abc");
        let delivery = FakeDeliverer::new(DeliveryOutcome::Sent);
        let sources = make_sources(&["missinguser", "conspiracy"]);

        let summary = run_once(&fetcher, &delivery, &seen_file, &sources, 4)
            .await
            .unwrap();

        assert_eq!(summary.errors, 1);
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.outcomes.len(), 2);
    }

    #[tokio::test]
    async fn test_all_mode_run_accumulates() {
        let tmp = TempDir::new().unwrap();
        let seen_file = SeenFile::new(tmp.path().join("seen.txt"), SeenMode::All);
        let sources = make_sources(&["conspiracy"]);

        let fetcher = FakeFetcher::with_post("conspiracy", "https://r/conspiracy/abc");
        let delivery = FakeDeliverer::new(DeliveryOutcome::Sent);
        run_once(&fetcher, &delivery, &seen_file, &sources, 4)
            .await
            .unwrap();

        // Upstream moves on; the earlier URL stays recorded.
        let fetcher = FakeFetcher::with_post("conspiracy", "https://r/conspiracy/def");
        let delivery = FakeDeliverer::new(DeliveryOutcome::Sent);
        run_once(&fetcher, &delivery, &seen_file, &sources, 4)
            .await
            .unwrap();

        let record = seen_file.load().await.unwrap();
        assert!(record.is_seen("conspiracy", "https://r/conspiracy/abc"));
        assert!(record.is_seen("conspiracy", "https://r/conspiracy/def"));
    }

    #[tokio::test]
    async fn test_run_latest_touches_nothing() {
        let fetcher = FakeFetcher::with_post("conspiracy", "https://r/conspiracy/abc");
        let sources = make_sources(&["conspiracy", "missinguser"]);

        let results = run_latest(&fetcher, &sources, 4).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "conspiracy");
        assert!(results[0].1.is_ok());
        assert!(matches!(
            results[1].1,
            Err(FetchError::AllInstancesFailed)
        ));
    }
}
