//! Normalized post data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform a post was fetched from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Reddit,
    Twitter,
}

/// A post fetched from an upstream feed, normalized across platforms.
///
/// `url` is the deduplication key and must be stable and unique per
/// real-world post. Produced fresh per fetch, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Monitored identity (subreddit name or account handle)
    pub identity: String,

    /// Post title (empty for platforms without titles)
    pub title: String,

    /// Post body, truncated to the configured maximum length
    pub text: String,

    /// Permalink; the deduplication key
    pub url: String,

    /// Author name as reported by the feed
    pub author: String,

    /// Publication timestamp, if the feed carried one
    pub published: Option<DateTime<Utc>>,

    /// Media URLs in encounter order, duplicates allowed
    pub media: Vec<String>,

    /// Originating platform
    pub source: Platform,
}

impl Post {
    /// Canned payload for exercising the webhook end to end.
    pub fn sample() -> Self {
        Self {
            identity: "conspiracy".to_string(),
            title: "BREAKING: Newly declassified documents reveal shocking connection..."
                .to_string(),
            text: "This is a test post to verify the webhook integration is working \
                   properly. The full story unfolds as we examine the evidence."
                .to_string(),
            url: "https://www.reddit.com/r/conspiracy/comments/test123".to_string(),
            author: "test_user".to_string(),
            published: DateTime::parse_from_rfc3339("2025-02-13T12:00:00Z")
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            media: Vec::new(),
            source: Platform::Reddit,
        }
    }
}
