//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and fetching behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Outbound webhook settings
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Seen-set persistence settings
    #[serde(default)]
    pub seen: SeenConfig,

    /// Mirror instance pool settings
    #[serde(default)]
    pub mirrors: MirrorConfig,

    /// Scrape-proxy settings
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Monitored sources
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    ///
    /// Missing sources or a missing webhook URL are the only fatal
    /// startup conditions; everything downstream degrades per source.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(AppError::validation("no sources configured"));
        }
        if self.webhook.url.trim().is_empty() {
            return Err(AppError::validation("webhook.url is empty"));
        }
        url::Url::parse(&self.webhook.url)
            .map_err(|e| AppError::validation(format!("webhook.url is invalid: {e}")))?;
        if self.webhook.timeout_secs == 0 {
            return Err(AppError::validation("webhook.timeout_secs must be > 0"));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.max_concurrent == 0 {
            return Err(AppError::validation("fetch.max_concurrent must be > 0"));
        }
        if self.fetch.reddit_timeout_secs == 0
            || self.fetch.mirror_timeout_secs == 0
            || self.fetch.proxy_timeout_secs == 0
        {
            return Err(AppError::validation("fetch timeouts must be > 0"));
        }
        if self.fetch.max_text_len == 0 {
            return Err(AppError::validation("fetch.max_text_len must be > 0"));
        }
        if self.mirrors.fail_threshold == 0 {
            return Err(AppError::validation("mirrors.fail_threshold must be > 0"));
        }

        let uses_mirrors = self
            .sources
            .iter()
            .any(|s| s.kind == SourceKind::Mirror);
        if uses_mirrors && self.mirrors.instances.is_empty() {
            return Err(AppError::validation(
                "mirror sources configured but mirrors.instances is empty",
            ));
        }

        let uses_proxy = self.sources.iter().any(|s| s.kind == SourceKind::Proxy);
        if uses_proxy {
            if self.proxy.endpoint.trim().is_empty() {
                return Err(AppError::validation(
                    "proxy sources configured but proxy.endpoint is empty",
                ));
            }
            if self.proxy.token.trim().is_empty() {
                return Err(AppError::validation(
                    "proxy sources configured but proxy.token is empty",
                ));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            webhook: WebhookConfig::default(),
            seen: SeenConfig::default(),
            mirrors: MirrorConfig::default(),
            proxy: ProxyConfig::default(),
            sources: Vec::new(),
        }
    }
}

/// HTTP client and fetching behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for HTTP requests (Reddit rejects defaults)
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Base URL for Reddit feed requests
    #[serde(default = "defaults::reddit_base")]
    pub reddit_base: String,

    /// Timeout for Reddit feed requests in seconds
    #[serde(default = "defaults::reddit_timeout")]
    pub reddit_timeout_secs: u64,

    /// Timeout for a single mirror instance request in seconds
    #[serde(default = "defaults::mirror_timeout")]
    pub mirror_timeout_secs: u64,

    /// Timeout for scrape-proxy requests in seconds
    #[serde(default = "defaults::proxy_timeout")]
    pub proxy_timeout_secs: u64,

    /// Maximum concurrent fetches across sources
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Maximum post text length before truncation
    #[serde(default = "defaults::max_text_len")]
    pub max_text_len: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            reddit_base: defaults::reddit_base(),
            reddit_timeout_secs: defaults::reddit_timeout(),
            mirror_timeout_secs: defaults::mirror_timeout(),
            proxy_timeout_secs: defaults::proxy_timeout(),
            max_concurrent: defaults::max_concurrent(),
            max_text_len: defaults::max_text_len(),
        }
    }
}

/// Outbound webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Destination URL for new-post payloads
    #[serde(default)]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::webhook_timeout")]
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_secs: defaults::webhook_timeout(),
        }
    }
}

/// Which persisted form the seen-set file uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeenMode {
    /// One last-delivered URL per identity, persisted as a JSON object
    Latest,
    /// Every delivered URL, persisted as a newline-delimited list
    All,
}

/// Seen-set persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeenConfig {
    /// Path of the seen-set file
    #[serde(default = "defaults::seen_path")]
    pub path: String,

    /// Persisted form of the seen set
    #[serde(default = "defaults::seen_mode")]
    pub mode: SeenMode,
}

impl Default for SeenConfig {
    fn default() -> Self {
        Self {
            path: defaults::seen_path(),
            mode: defaults::seen_mode(),
        }
    }
}

/// Mirror instance pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Equivalent upstream instances in priority order
    #[serde(default = "defaults::mirror_instances")]
    pub instances: Vec<String>,

    /// Failures before an instance is dropped from the pool
    #[serde(default = "defaults::fail_threshold")]
    pub fail_threshold: u32,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            instances: defaults::mirror_instances(),
            fail_threshold: defaults::fail_threshold(),
        }
    }
}

/// Scrape-proxy settings for HTML-rendered sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Rendering proxy endpoint
    #[serde(default = "defaults::proxy_endpoint")]
    pub endpoint: String,

    /// Proxy API token
    #[serde(default)]
    pub token: String,

    /// Base URL of the profile pages handed to the proxy
    #[serde(default = "defaults::target_base")]
    pub target_base: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::proxy_endpoint(),
            token: String::new(),
            target_base: defaults::target_base(),
        }
    }
}

/// Fetch strategy for a monitored source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Reddit subreddit feed
    Subreddit,
    /// Account handle fetched through the mirror pool
    Mirror,
    /// Account handle fetched through the rendering proxy
    Proxy,
}

/// A monitored source: one identity plus its fetch strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceEntry {
    /// Subreddit name or account handle
    pub identity: String,

    /// Fetch strategy
    pub kind: SourceKind,
}

mod defaults {
    use super::SeenMode;

    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into()
    }
    pub fn reddit_base() -> String {
        "https://www.reddit.com".into()
    }
    pub fn reddit_timeout() -> u64 {
        15
    }
    pub fn mirror_timeout() -> u64 {
        10
    }
    pub fn proxy_timeout() -> u64 {
        20
    }
    pub fn max_concurrent() -> usize {
        4
    }
    pub fn max_text_len() -> usize {
        500
    }

    // Webhook defaults
    pub fn webhook_timeout() -> u64 {
        10
    }

    // Seen-set defaults
    pub fn seen_path() -> String {
        "seen_posts.json".into()
    }
    pub fn seen_mode() -> SeenMode {
        SeenMode::Latest
    }

    // Mirror defaults
    pub fn mirror_instances() -> Vec<String> {
        vec![
            "https://nitter.net".into(),
            "https://nitter.poast.org".into(),
            "https://nitter.privacydev.net".into(),
        ]
    }
    pub fn fail_threshold() -> u32 {
        3
    }

    // Proxy defaults
    pub fn proxy_endpoint() -> String {
        "https://api.scrape.do".into()
    }
    pub fn target_base() -> String {
        "https://twitter.com".into()
    }
}
