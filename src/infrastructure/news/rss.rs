use crate::domain::article::Article;
use crate::domain::ports::NewsFeed;
use crate::infrastructure::core::HttpClientFactory;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use rss::{Channel, Item};
use std::collections::HashMap;
use std::io::Cursor;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RssFeedConfig {
    pub feed_urls: Vec<String>,
    pub limit_per_feed: usize,
    /// How long a collected link is remembered.
    pub cache_expiration: Duration,
    /// Pause between two feeds.
    pub feed_pause: Duration,
    pub timeout: Duration,
}

impl Default for RssFeedConfig {
    fn default() -> Self {
        Self {
            feed_urls: Vec::new(),
            limit_per_feed: 5,
            cache_expiration: Duration::from_secs(3600),
            feed_pause: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Collects new articles from a list of RSS feeds.
///
/// Links are remembered for `cache_expiration`; an item whose link was
/// collected within that window is skipped. Titles are not deduplicated, so
/// the same story from several outlets counts once per outlet.
pub struct RssNewsFeed {
    config: RssFeedConfig,
    client: ClientWithMiddleware,
    seen_links: Mutex<HashMap<String, Instant>>,
}

impl RssNewsFeed {
    pub fn new(config: RssFeedConfig) -> Self {
        let client = HttpClientFactory::create_client(config.timeout);
        Self {
            config,
            client,
            seen_links: Mutex::new(HashMap::new()),
        }
    }

    async fn fetch_channel(&self, url: &str) -> Result<Channel> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("reading body of {} failed", url))?;
        Channel::read_from(Cursor::new(bytes)).with_context(|| format!("invalid RSS from {}", url))
    }

    /// Keeps the first `limit_per_feed` items whose links are not cached,
    /// caching each collected link.
    async fn collect(&self, channel: &Channel, feed_url: &str) -> Vec<Article> {
        let source = source_name(channel, feed_url);
        let mut seen = self.seen_links.lock().await;
        let now = Instant::now();

        let articles: Vec<Article> = channel
            .items()
            .iter()
            .take(self.config.limit_per_feed)
            .filter_map(|item| item_to_article(item, &source))
            .filter(|article| {
                if seen.contains_key(&article.link) {
                    return false;
                }
                seen.insert(article.link.clone(), now);
                true
            })
            .collect();

        if articles.is_empty() {
            info!("RssNewsFeed: [{}] no new articles (already cached)", source);
        } else {
            info!("RssNewsFeed: [{}] collected {} new articles", source, articles.len());
        }
        articles
    }

    async fn purge_expired(&self) {
        let mut seen = self.seen_links.lock().await;
        let before = seen.len();
        let expiration = self.config.cache_expiration;
        seen.retain(|_, first_seen| first_seen.elapsed() <= expiration);

        let purged = before - seen.len();
        if purged > 0 {
            info!("RssNewsFeed: purged {} expired links from cache", purged);
        }
    }
}

fn source_name(channel: &Channel, feed_url: &str) -> String {
    let title = channel.title().trim();
    if title.is_empty() {
        feed_url.to_string()
    } else {
        title.to_string()
    }
}

/// Maps an item to an article keyed by its link, or its guid when the link
/// is missing. Items with neither are skipped.
fn item_to_article(item: &Item, source: &str) -> Option<Article> {
    let link = item
        .link()
        .or_else(|| item.guid().map(|guid| guid.value()))
        .map(str::trim)
        .filter(|link| !link.is_empty());

    let Some(link) = link else {
        debug!(
            "RssNewsFeed: [{}] skipping item without link or guid: {:?}",
            source,
            item.title()
        );
        return None;
    };

    Some(Article::new(
        item.title().unwrap_or("No title"),
        item.description().unwrap_or("No summary"),
        source,
        item.pub_date().unwrap_or("Unknown date"),
        link,
    ))
}

#[async_trait]
impl NewsFeed for RssNewsFeed {
    async fn fetch_articles(&self) -> Result<Vec<Article>> {
        self.purge_expired().await;

        let mut articles = Vec::new();
        for (i, url) in self.config.feed_urls.iter().enumerate() {
            match self.fetch_channel(url).await {
                Ok(channel) => articles.extend(self.collect(&channel, url).await),
                Err(e) => error!("RssNewsFeed: failed to collect {}: {:#}", url, e),
            }

            if i + 1 < self.config.feed_urls.len() && !self.config.feed_pause.is_zero() {
                tokio::time::sleep(self.config.feed_pause).await;
            }
        }

        info!(
            "RssNewsFeed: {} new articles from {} feeds",
            articles.len(),
            self.config.feed_urls.len()
        );
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Market Wire</title>
    <link>https://wire.example.com</link>
    <description>markets</description>
    <item>
      <title>Airlines cut capacity</title>
      <description>Carriers trim routes.</description>
      <link>https://wire.example.com/a</link>
      <pubDate>Mon, 15 Jan 2024 10:00:00 GMT</pubDate>
    </item>
    <item>
      <link>https://wire.example.com/b</link>
    </item>
    <item>
      <title>Third story</title>
      <link>https://wire.example.com/c</link>
    </item>
  </channel>
</rss>"#;

    fn channel() -> Channel {
        Channel::read_from(Cursor::new(FEED.as_bytes())).unwrap()
    }

    fn feed(limit: usize, expiration: Duration) -> RssNewsFeed {
        RssNewsFeed::new(RssFeedConfig {
            feed_urls: vec!["https://wire.example.com/rss".into()],
            limit_per_feed: limit,
            cache_expiration: expiration,
            feed_pause: Duration::ZERO,
            timeout: Duration::from_secs(1),
        })
    }

    #[tokio::test]
    async fn test_items_map_to_articles_with_defaults() {
        let feed = feed(5, Duration::from_secs(3600));

        let articles = feed.collect(&channel(), "https://wire.example.com/rss").await;

        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].title, "Airlines cut capacity");
        assert_eq!(articles[0].source, "Market Wire");
        assert_eq!(articles[0].published, "Mon, 15 Jan 2024 10:00:00 GMT");
        assert_eq!(articles[1].title, "No title");
        assert_eq!(articles[1].summary, "No summary");
        assert_eq!(articles[1].published, "Unknown date");
    }

    #[tokio::test]
    async fn test_limit_per_feed_and_link_cache() {
        let feed = feed(2, Duration::from_secs(3600));

        let first = feed.collect(&channel(), "u").await;
        let second = feed.collect(&channel(), "u").await;

        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_items_without_link_fall_back_to_guid_or_are_skipped() {
        const LINKLESS: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Market Wire</title>
    <link>https://wire.example.com</link>
    <description>markets</description>
    <item>
      <title>Guid only</title>
      <guid isPermaLink="false">wire-4411</guid>
    </item>
    <item>
      <title>No identity</title>
    </item>
    <item>
      <title>Also no identity</title>
    </item>
  </channel>
</rss>"#;
        let channel = Channel::read_from(Cursor::new(LINKLESS.as_bytes())).unwrap();
        let feed = feed(5, Duration::from_secs(3600));

        let articles = feed.collect(&channel, "u").await;

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link, "wire-4411");
        assert!(!feed.seen_links.lock().await.contains_key(""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_links_are_collected_again() {
        let feed = feed(5, Duration::from_secs(60));
        assert_eq!(feed.collect(&channel(), "u").await.len(), 3);

        tokio::time::advance(Duration::from_secs(61)).await;
        feed.purge_expired().await;

        assert_eq!(feed.collect(&channel(), "u").await.len(), 3);
    }
}
