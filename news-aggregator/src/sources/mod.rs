pub mod newsapi;
pub mod rss_feed;

pub use newsapi::NewsApiSource;
pub use rss_feed::RssFeedSource;
