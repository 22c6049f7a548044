//! Scrape-proxy fetching for HTML-rendered profiles.
//!
//! A third-party rendering proxy returns the profile page's DOM; the
//! latest post is extracted with an ordered list of fallback selectors
//! since the markup shifts between deployments.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::FetchError;
use crate::models::{FetchConfig, Platform, Post, ProxyConfig};
use crate::utils::resolve_url;
use crate::utils::text;

/// Post container candidates, tried in order.
const CONTAINER_SELECTORS: [&str; 2] = ["article", r#"div[data-testid="tweet"]"#];

/// Post text candidates within a container, tried in order.
const TEXT_SELECTORS: [&str; 2] = ["div[lang]", r#"div[data-testid="tweetText"]"#];

/// Fetch the latest post for an identity through the rendering proxy.
pub async fn fetch_proxy(
    client: &Client,
    config: &FetchConfig,
    proxy: &ProxyConfig,
    identity: &str,
) -> Result<Post, FetchError> {
    let target = format!(
        "{}/{}",
        proxy.target_base.trim_end_matches('/'),
        identity
    );

    let response = client
        .get(&proxy.endpoint)
        .query(&[("token", proxy.token.as_str()), ("url", target.as_str())])
        .timeout(Duration::from_secs(config.proxy_timeout_secs))
        .send()
        .await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let html = response.text().await?;
    parse_rendered_profile(&html, identity, &proxy.target_base, config.max_text_len)
}

/// Extract the latest post from a rendered profile page.
///
/// Returns `IncompleteExtraction` unless both the text and the
/// permalink were found.
fn parse_rendered_profile(
    html: &str,
    identity: &str,
    target_base: &str,
    max_text_len: usize,
) -> Result<Post, FetchError> {
    let document = Html::parse_document(html);

    let article = first_match(&document, &CONTAINER_SELECTORS)?
        .ok_or(FetchError::IncompleteExtraction)?;

    let mut post_text = String::new();
    for selector_str in TEXT_SELECTORS {
        let selector = parse_selector(selector_str)?;
        if let Some(element) = article.select(&selector).next() {
            post_text = element.text().collect::<String>().trim().to_string();
            break;
        }
    }

    // Images minus avatars (heuristic: profile pictures carry
    // "profile" in their source path), then videos. Encounter order,
    // duplicates allowed.
    let mut media = Vec::new();
    let img_sel = parse_selector("img")?;
    for img in article.select(&img_sel) {
        if let Some(src) = img.value().attr("src") {
            if !src.contains("profile") {
                media.push(src.to_string());
            }
        }
    }
    let video_sel = parse_selector("video")?;
    for video in article.select(&video_sel) {
        if let Some(src) = video.value().attr("src") {
            media.push(src.to_string());
        }
    }

    let link_sel = parse_selector("a[href]")?;
    let link = article
        .select(&link_sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| {
            Url::parse(target_base)
                .map(|base| resolve_url(&base, href))
                .ok()
        });

    let Some(url) = link else {
        return Err(FetchError::IncompleteExtraction);
    };
    if post_text.is_empty() {
        return Err(FetchError::IncompleteExtraction);
    }

    Ok(Post {
        identity: identity.to_string(),
        title: String::new(),
        text: text::truncate(&post_text, max_text_len),
        url,
        author: identity.to_string(),
        published: None,
        media,
        source: Platform::Twitter,
    })
}

/// Try each container selector in order; first hit wins.
fn first_match<'a>(
    document: &'a Html,
    selectors: &[&str],
) -> Result<Option<ElementRef<'a>>, FetchError> {
    for selector_str in selectors {
        let selector = parse_selector(selector_str)?;
        if let Some(element) = document.select(&selector).next() {
            return Ok(Some(element));
        }
    }
    Ok(None)
}

fn parse_selector(s: &str) -> Result<Selector, FetchError> {
    Selector::parse(s).map_err(|e| FetchError::Exception(format!("selector '{s}': {e:?}")))
}
