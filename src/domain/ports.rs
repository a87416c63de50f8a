use crate::domain::article::Article;
use crate::domain::errors::ScoringError;
use anyhow::Result;
use async_trait::async_trait;

/// Language-model backend that answers a scoring prompt with a JSON object.
#[async_trait]
pub trait SentimentBackend: Send + Sync {
    /// Sends `prompt` and returns the raw JSON content of the reply.
    async fn complete_json(&self, prompt: &str) -> Result<String, ScoringError>;

    fn name(&self) -> &str;
}

/// Source of already de-duplicated articles for one pipeline cycle.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    async fn fetch_articles(&self) -> Result<Vec<Article>>;
}

/// Delivery channel for pre-formatted pipeline messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Best effort: delivery failures are logged by the implementation.
    async fn notify(&self, message: &str);
}
