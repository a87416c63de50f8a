use serde::{Deserialize, Serialize};

/// A news article as delivered by the feed collaborator.
///
/// `link` is the article identity: scores are cached per link within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub summary: String,
    pub source: String,
    pub published: String,
    pub link: String,
}

impl Article {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        source: impl Into<String>,
        published: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            source: source.into(),
            published: published.into(),
            link: link.into(),
        }
    }

    /// Text handed to the scoring backend.
    pub fn scoring_text(&self) -> String {
        format!("Title: {}\n\nSummary: {}", self.title, self.summary)
    }

    /// Lowercased `title summary`, used for keyword matching by biased agents.
    pub fn headline_text(&self) -> String {
        format!("{} {}", self.title, self.summary).to_lowercase()
    }
}
