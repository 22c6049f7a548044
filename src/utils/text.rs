//! Text preprocessing for feed content.
//!
//! Reddit feeds embed rendered HTML in entry summaries; strip it down
//! to plain text before truncation so the marker lands on real content.

use std::sync::OnceLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Marker appended when text exceeds the configured maximum.
pub const TRUNCATION_MARKER: &str = "...";

fn tag_pattern() -> &'static Regex {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Strip HTML tags, decode common entities, and collapse whitespace.
pub fn strip_tags(s: &str) -> String {
    let without_tags = tag_pattern().replace_all(s, " ");
    let decoded = without_tags
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to `max` graphemes, appending the truncation marker when
/// anything was cut. Grapheme-based so multi-byte content never splits.
pub fn truncate(s: &str, max: usize) -> String {
    match s.grapheme_indices(true).nth(max) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}{}", &s[..idx], TRUNCATION_MARKER),
    }
}
