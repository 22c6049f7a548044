//! Mirror-pool fetching.
//!
//! Multiple equivalent instances serve the same identity; instances
//! are tried in priority order and every kind of miss (non-200, empty
//! feed, request error) counts against the instance's health. Mirrors
//! can lag each other, so there is no guarantee about *which* mirror's
//! latest post wins — only that a healthy mirror answers.

use std::time::Duration;

use feed_rs::model::Feed;
use reqwest::{Client, StatusCode};

use crate::error::FetchError;
use crate::models::{FetchConfig, Platform, Post};

use super::feed;
use super::health::MirrorPool;

/// Fetch the latest post for an identity through the mirror pool.
pub async fn fetch_mirror(
    client: &Client,
    config: &FetchConfig,
    pool: &MirrorPool,
    identity: &str,
) -> Result<Post, FetchError> {
    for instance in pool.active() {
        let url = format!("{}/{}/rss", instance, identity);

        let parsed = match fetch_instance_feed(client, config, &url).await {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("mirror {} failed for {}: {}", instance, identity, err);
                pool.record_failure(&instance);
                continue;
            }
        };

        match parsed.entries.into_iter().next() {
            Some(entry) => {
                return Ok(feed::post_from_entry(
                    identity,
                    entry,
                    Platform::Twitter,
                    config.max_text_len,
                ));
            }
            None => {
                log::warn!("mirror {} returned empty feed for {}", instance, identity);
                pool.record_failure(&instance);
            }
        }
    }

    Err(FetchError::AllInstancesFailed)
}

/// One GET against one instance, parsed as a feed.
async fn fetch_instance_feed(
    client: &Client,
    config: &FetchConfig,
    url: &str,
) -> Result<Feed, FetchError> {
    let response = client
        .get(url)
        .timeout(Duration::from_secs(config.mirror_timeout_secs))
        .send()
        .await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let body = response.bytes().await?;
    feed::parse(&body)
}
