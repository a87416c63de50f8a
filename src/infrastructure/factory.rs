use crate::config::{Config, Mode};
use crate::domain::ports::{NewsFeed, Notifier, SentimentBackend};
use crate::infrastructure::mock::{MockSentimentBackend, StaticNewsFeed};
use crate::infrastructure::news::{RssFeedConfig, RssNewsFeed};
use crate::infrastructure::notify::{ConsoleNotifier, DiscordNotifier};
use crate::infrastructure::openai::OpenAiSentimentBackend;
use std::sync::Arc;
use std::time::Duration;

pub struct ServiceFactory;

impl ServiceFactory {
    /// Scoring backend and news feed for the configured mode.
    pub fn create_services(config: &Config) -> (Arc<dyn SentimentBackend>, Arc<dyn NewsFeed>) {
        match config.pipeline.mode {
            Mode::Mock => (
                Arc::new(MockSentimentBackend::keyword()),
                Arc::new(StaticNewsFeed::sample()),
            ),
            Mode::OpenAi => {
                let feed = RssNewsFeed::new(RssFeedConfig {
                    feed_urls: config.pipeline.rss_feeds.clone(),
                    limit_per_feed: config.pipeline.news_limit_per_feed,
                    cache_expiration: config.pipeline.news_cache_expiration,
                    feed_pause: Duration::from_millis(500),
                    timeout: config.scoring.openai.timeout,
                });
                (
                    Arc::new(OpenAiSentimentBackend::new(config.scoring.openai.clone())),
                    Arc::new(feed),
                )
            }
        }
    }

    pub fn create_notifier(config: &Config) -> Arc<dyn Notifier> {
        match (&config.pipeline.use_discord, &config.pipeline.discord_webhook_url) {
            (true, Some(url)) => Arc::new(DiscordNotifier::new(url.clone())),
            _ => Arc::new(ConsoleNotifier),
        }
    }
}
