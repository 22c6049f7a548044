//! Shared feed parsing helpers.
//!
//! Both feed strategies go through here: Reddit serves Atom, Nitter
//! mirrors serve RSS 2.0, and `feed_rs` normalizes the two.

use feed_rs::model::{Entry, Feed};

use crate::error::FetchError;
use crate::models::{Platform, Post};
use crate::utils::text;

/// Parse a feed body, preserving the parser message on failure.
pub(crate) fn parse(bytes: &[u8]) -> Result<Feed, FetchError> {
    feed_rs::parser::parse(bytes).map_err(|e| FetchError::Exception(e.to_string()))
}

/// Pick an entry's permalink: an alternate (or unqualified) link wins,
/// any non-empty href is the fallback.
fn entry_link(entry: &Entry) -> Option<String> {
    for link in &entry.links {
        let href = link.href.trim();
        if href.is_empty() {
            continue;
        }
        let rel = link.rel.as_deref().unwrap_or("");
        if rel.is_empty() || rel.eq_ignore_ascii_case("alternate") {
            return Some(href.to_string());
        }
    }
    entry
        .links
        .iter()
        .find(|l| !l.href.trim().is_empty())
        .map(|l| l.href.clone())
}

/// Convert the most recent feed entry into a normalized post.
pub(crate) fn post_from_entry(
    identity: &str,
    entry: Entry,
    source: Platform,
    max_text_len: usize,
) -> Post {
    let title = entry
        .title
        .as_ref()
        .map(|t| t.content.clone())
        .unwrap_or_default();

    // Entries without a link still need a stable dedup key; the feed
    // id (Reddit's t3_* guid) serves.
    let url = entry_link(&entry).unwrap_or_else(|| entry.id.clone());

    let author = entry
        .authors
        .first()
        .map(|a| a.name.clone())
        .unwrap_or_default();

    let raw_text = entry
        .summary
        .as_ref()
        .map(|s| s.content.clone())
        .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()))
        .unwrap_or_default();
    let text = text::truncate(&text::strip_tags(&raw_text), max_text_len);

    let media = entry
        .media
        .iter()
        .flat_map(|m| m.content.iter())
        .filter_map(|c| c.url.as_ref().map(|u| u.to_string()))
        .collect();

    Post {
        identity: identity.to_string(),
        title,
        text,
        url,
        author,
        published: entry.published.or(entry.updated),
        media,
        source,
    }
}
