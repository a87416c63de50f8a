pub mod prompt;
pub mod scorer;

pub use scorer::{ArticleScore, RetryPolicy, ScoreSource, SentimentScorer};
