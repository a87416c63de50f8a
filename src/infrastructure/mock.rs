use crate::domain::article::Article;
use crate::domain::errors::ScoringError;
use crate::domain::ports::{NewsFeed, Notifier, SentimentBackend};
use crate::domain::sector::Sector;
use anyhow::{Result, bail};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

type Responder = Box<dyn Fn(&str) -> Result<String, ScoringError> + Send + Sync>;

const BULLISH_WORDS: &[&str] = &[
    "surge", "rally", "record", "beat", "approves", "breakthrough", "boom", "eases",
];
const BEARISH_WORDS: &[&str] = &[
    "plunge", "default", "warn", "decline", "crisis", "shortage", "headwinds", "lawsuit",
];

/// Scoring backend for offline runs and tests.
///
/// Replies come from a script (consumed in order), then from the responder.
pub struct MockSentimentBackend {
    script: Mutex<VecDeque<Result<String, ScoringError>>>,
    responder: Responder,
    calls: Mutex<Vec<Instant>>,
}

impl MockSentimentBackend {
    pub fn with_responder(
        responder: impl Fn(&str) -> Result<String, ScoringError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always replies with `body`.
    pub fn always(body: &str) -> Self {
        let body = body.to_string();
        Self::with_responder(move |_| Ok(body.clone()))
    }

    /// Replies with `script` in order, then fails with a transport error.
    pub fn scripted(script: Vec<Result<String, ScoringError>>) -> Self {
        let backend = Self::with_responder(|_| {
            Err(ScoringError::Transport("mock script exhausted".to_string()))
        });
        *backend.script.lock().unwrap_or_else(|e| e.into_inner()) = script.into();
        backend
    }

    /// Keyword heuristic: sectors named in the article move with the tone of
    /// the headline (+3 bullish, -3 bearish).
    pub fn keyword() -> Self {
        Self::with_responder(|prompt| Ok(keyword_scores(prompt).to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Offsets of every call from `start`.
    pub fn call_instants_offsets(&self, start: Instant) -> Vec<Duration> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|at| at.duration_since(start))
            .collect()
    }
}

fn keyword_scores(prompt: &str) -> serde_json::Value {
    let article = prompt
        .split("NEWS ARTICLE:")
        .nth(1)
        .and_then(|rest| rest.split("IMPORTANT:").next())
        .unwrap_or(prompt)
        .to_lowercase();

    let bullish = BULLISH_WORDS.iter().filter(|w| article.contains(*w)).count() as i64;
    let bearish = BEARISH_WORDS.iter().filter(|w| article.contains(*w)).count() as i64;
    let tone = (bullish - bearish).signum() * 3;

    let mut reply = serde_json::Map::new();
    for sector in Sector::ALL {
        let mentioned = article.contains(&sector.name().to_lowercase());
        let score = if mentioned { tone } else { 0 };
        reply.insert(sector.name().to_string(), score.into());
    }
    serde_json::Value::Object(reply)
}

#[async_trait]
impl SentimentBackend for MockSentimentBackend {
    async fn complete_json(&self, prompt: &str) -> Result<String, ScoringError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Instant::now());

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();

        match scripted {
            Some(reply) => reply,
            None => (self.responder)(prompt),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Feed that serves the same batch on every fetch.
#[derive(Clone, Default)]
pub struct StaticNewsFeed {
    articles: Vec<Article>,
}

impl StaticNewsFeed {
    pub fn new(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Five headlines covering technology, energy, chips, banks and pharma.
    pub fn sample() -> Self {
        Self::new(vec![
            Article::new(
                "Tech Giants Report Record Earnings, AI Boom Continues",
                "Major technology companies including Microsoft and Google reported record-breaking earnings driven by artificial intelligence demand.",
                "Tech News",
                "2024-01-15",
                "https://example.com/article1",
            ),
            Article::new(
                "Oil Prices Plunge on Oversupply Concerns",
                "Crude oil prices dropped 5% as OPEC announced production increases, raising concerns about global oversupply in the energy market.",
                "Energy Today",
                "2024-01-15",
                "https://example.com/article2",
            ),
            Article::new(
                "Semiconductor Shortage Eases, Prices Decline",
                "Chip manufacturers report improved supply chains as semiconductor shortage finally shows signs of ending.",
                "Chip Weekly",
                "2024-01-15",
                "https://example.com/article3",
            ),
            Article::new(
                "Banking Sector Faces Headwinds from Rising Defaults",
                "Major banks warn of increasing loan defaults as economic uncertainty weighs on financials.",
                "Finance Daily",
                "2024-01-15",
                "https://example.com/article4",
            ),
            Article::new(
                "Healthcare Stocks Surge on Drug Approval News",
                "Pharmaceutical companies rally after FDA approves breakthrough cancer treatment.",
                "Med News",
                "2024-01-15",
                "https://example.com/article5",
            ),
        ])
    }
}

#[async_trait]
impl NewsFeed for StaticNewsFeed {
    async fn fetch_articles(&self) -> Result<Vec<Article>> {
        info!("StaticNewsFeed: serving {} articles", self.articles.len());
        Ok(self.articles.clone())
    }
}

/// Feed whose first `failures` fetches fail with `reason`, then serves
/// `articles` on every fetch.
pub struct FailingNewsFeed {
    failures: usize,
    reason: String,
    articles: Vec<Article>,
    fetches: AtomicUsize,
}

impl FailingNewsFeed {
    pub fn new(failures: usize, reason: &str, articles: Vec<Article>) -> Self {
        Self {
            failures,
            reason: reason.to_string(),
            articles,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsFeed for FailingNewsFeed {
    async fn fetch_articles(&self) -> Result<Vec<Article>> {
        let attempt = self.fetches.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            bail!("{}", self.reason);
        }
        Ok(self.articles.clone())
    }
}

/// Notifier that keeps every message, for assertions.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scores::SectorScores;

    #[tokio::test]
    async fn test_script_then_responder() {
        let backend = MockSentimentBackend::scripted(vec![Err(ScoringError::RateLimited)]);
        assert_eq!(
            backend.complete_json("p").await,
            Err(ScoringError::RateLimited)
        );
        assert!(matches!(
            backend.complete_json("p").await,
            Err(ScoringError::Transport(_))
        ));
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_keyword_backend_scores_mentioned_sectors() {
        let backend = MockSentimentBackend::keyword();
        let prompt = "NEWS ARTICLE:\nHealthcare stocks surge on approval\nIMPORTANT: Technology";
        let reply = backend.complete_json(prompt).await.unwrap();
        let scores = SectorScores::from_backend_json(&reply).unwrap();
        assert_eq!(scores.get(Sector::Healthcare), 3);
        assert_eq!(scores.get(Sector::Technology), 0);
    }

    #[tokio::test]
    async fn test_failing_feed_recovers_after_failures() {
        let feed = FailingNewsFeed::new(1, "timeout", StaticNewsFeed::sample().articles().to_vec());

        let err = feed.fetch_articles().await.unwrap_err();
        assert_eq!(err.to_string(), "timeout");
        assert_eq!(feed.fetch_articles().await.unwrap().len(), 5);
        assert_eq!(feed.fetches(), 2);
    }
}
