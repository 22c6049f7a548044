//! Webhook delivery service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::models::{DeliveryOutcome, Post, WebhookConfig};

use super::Deliver;

/// Posts normalized posts as JSON to the configured automation webhook.
///
/// One POST, no retries; the dispatcher's retry-by-omission (an
/// undelivered URL is never marked seen) is the only retry mechanism.
pub struct WebhookDelivery {
    client: Client,
    url: String,
    timeout: Duration,
}

impl WebhookDelivery {
    pub fn new(client: Client, config: &WebhookConfig) -> Self {
        Self {
            client,
            url: config.url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[async_trait]
impl Deliver for WebhookDelivery {
    async fn deliver(&self, post: &Post) -> DeliveryOutcome {
        let result = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(post)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => DeliveryOutcome::Sent,
            Ok(response) => {
                let code = response.status().as_u16();
                log::warn!("webhook rejected post for {} with HTTP {}", post.identity, code);
                DeliveryOutcome::FailedHttp(code)
            }
            Err(err) => {
                log::warn!("webhook request for {} failed: {}", post.identity, err);
                DeliveryOutcome::FailedException
            }
        }
    }
}
