mod service;
pub mod tasks;

pub use service::{parse_interval, Scheduler};
pub use tasks::{ingest_feed, scrape_next_feed, CycleReport};
