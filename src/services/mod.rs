//! Service layer for the relay application.
//!
//! This module contains the business logic for:
//! - Upstream fetching (`FeedFetcher` and the per-strategy modules)
//! - Mirror instance health tracking (`MirrorPool`)
//! - Webhook delivery (`WebhookDelivery`)

mod feed;
mod fetch;
mod health;
mod mirror;
mod proxy;
mod reddit;
mod webhook;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{DeliveryOutcome, Post, SourceEntry};

pub use fetch::FeedFetcher;
pub use health::MirrorPool;
pub use webhook::WebhookDelivery;

/// One upstream fetch: resolve a source to its latest post.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, source: &SourceEntry) -> Result<Post, FetchError>;
}

/// One downstream delivery: hand a post to the automation webhook.
///
/// Delivery never raises; every failure mode is folded into the
/// returned outcome.
#[async_trait]
pub trait Deliver: Send + Sync {
    async fn deliver(&self, post: &Post) -> DeliveryOutcome;
}
