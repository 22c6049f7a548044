//! Reddit feed fetching.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::error::FetchError;
use crate::models::{FetchConfig, Platform, Post};

use super::feed;

/// Fetch the latest post from a subreddit's feed.
pub async fn fetch_subreddit(
    client: &Client,
    config: &FetchConfig,
    identity: &str,
) -> Result<Post, FetchError> {
    let url = format!(
        "{}/r/{}/.rss",
        config.reddit_base.trim_end_matches('/'),
        identity
    );

    let response = client
        .get(&url)
        .timeout(Duration::from_secs(config.reddit_timeout_secs))
        .send()
        .await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let body = response.bytes().await?;
    let parsed = feed::parse(&body)?;

    let entry = parsed
        .entries
        .into_iter()
        .next()
        .ok_or(FetchError::NoEntries)?;

    Ok(feed::post_from_entry(
        identity,
        entry,
        Platform::Reddit,
        config.max_text_len,
    ))
}
