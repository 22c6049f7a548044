//! Strategy-dispatching fetcher.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::FetchError;
use crate::models::{Config, Post, SourceEntry, SourceKind};

use super::health::MirrorPool;
use super::{mirror, proxy, reddit, Fetch};

/// Resolves each configured source through its fetch strategy.
///
/// Owns the shared HTTP client and the mirror pool; the pool's state
/// carries across every source fetched during the process lifetime.
pub struct FeedFetcher {
    config: Arc<Config>,
    client: Client,
    mirrors: MirrorPool,
}

impl FeedFetcher {
    pub fn new(config: Arc<Config>, client: Client) -> Self {
        let mirrors = MirrorPool::new(
            &config.mirrors.instances,
            config.mirrors.fail_threshold,
        );
        Self {
            config,
            client,
            mirrors,
        }
    }

    /// The shared mirror pool (health state is process-lifetime).
    pub fn mirrors(&self) -> &MirrorPool {
        &self.mirrors
    }
}

#[async_trait]
impl Fetch for FeedFetcher {
    async fn fetch(&self, source: &SourceEntry) -> Result<Post, FetchError> {
        match source.kind {
            SourceKind::Subreddit => {
                reddit::fetch_subreddit(&self.client, &self.config.fetch, &source.identity)
                    .await
            }
            SourceKind::Mirror => {
                mirror::fetch_mirror(
                    &self.client,
                    &self.config.fetch,
                    &self.mirrors,
                    &source.identity,
                )
                .await
            }
            SourceKind::Proxy => {
                proxy::fetch_proxy(
                    &self.client,
                    &self.config.fetch,
                    &self.config.proxy,
                    &source.identity,
                )
                .await
            }
        }
    }
}
