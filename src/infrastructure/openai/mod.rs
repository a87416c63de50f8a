pub mod client;

pub use client::{OpenAiConfig, OpenAiSentimentBackend};
