use crate::domain::ports::Notifier;
use crate::infrastructure::core::HttpClientFactory;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct WebhookMessage {
    content: String,
}

/// Webhook body: the message prefixed with a local `[YYYY-mm-dd HH:MM:SS]`.
fn webhook_body<Tz: TimeZone>(message: &str, now: DateTime<Tz>) -> serde_json::Result<String>
where
    Tz::Offset: std::fmt::Display,
{
    serde_json::to_string(&WebhookMessage {
        content: format!("[{}] {}", now.format("%Y-%m-%d %H:%M:%S"), message),
    })
}

/// Logs each message, then posts it to a Discord webhook. Delivery failures
/// are logged and dropped.
pub struct DiscordNotifier {
    webhook_url: String,
    client: ClientWithMiddleware,
}

impl DiscordNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            client: HttpClientFactory::create_client(Duration::from_secs(10)),
        }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, message: &str) {
        info!("{}", message);

        let body = match webhook_body(message, Local::now()) {
            Ok(body) => body,
            Err(e) => {
                warn!("DiscordNotifier: failed to encode message: {}", e);
                return;
            }
        };

        let result = self
            .client
            .post(&self.webhook_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        match result {
            Ok(response) if !response.status().is_success() => {
                warn!("DiscordNotifier: webhook rejected message: {}", response.status());
            }
            Ok(_) => {}
            Err(e) => warn!("DiscordNotifier: delivery failed: {}", e),
        }
    }
}
