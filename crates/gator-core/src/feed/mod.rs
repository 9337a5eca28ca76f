mod document;
mod fetcher;
mod parser;

pub use document::{Channel, FeedDocument, FeedItem, NOTHING_NEW};
pub use fetcher::{FeedFetcher, FetchFeed};
pub use parser::parse_rss;
