pub mod rss;

pub use rss::{RssFeedConfig, RssNewsFeed};
