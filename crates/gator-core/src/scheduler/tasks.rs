use std::io::Write;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::feed::{FeedItem, FetchFeed};
use crate::models::{Feed, Post, User};
use crate::storage::Repository;
use crate::{Error, Result};

/// `pubDate` layout: weekday, day, abbreviated month, year, 24h time, numeric offset
const PUB_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";
/// The same layout once a valid weekday has been stripped
const DATE_FORMAT: &str = "%d %b %Y %H:%M:%S %z";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Outcome counts for one ingestion cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub feed_name: String,
    pub inserted: u32,
    pub duplicates: u32,
    pub failed: u32,
}

enum ItemOutcome {
    Stored,
    Duplicate,
    Failed,
}

/// Parse a `pubDate` such as "Mon, 02 Jan 2006 15:04:05 -0700"
///
/// The weekday must be a valid abbreviation; it is not checked against the
/// date.
pub fn parse_pub_date(text: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    let text = text.trim();
    let parsed = match text.split_once(", ") {
        Some((weekday, date)) if WEEKDAYS.contains(&weekday) => {
            DateTime::parse_from_str(date, DATE_FORMAT)
        }
        // No valid weekday: the full layout reports why
        _ => DateTime::parse_from_str(text, PUB_DATE_FORMAT),
    };
    parsed.map(|dt| dt.with_timezone(&Utc))
}

/// Run one cycle against the followed feed that is most overdue
pub async fn scrape_next_feed<W>(
    repo: &dyn Repository,
    fetcher: &dyn FetchFeed,
    user: &User,
    out: &mut W,
) -> Result<CycleReport>
where
    W: Write + Send + ?Sized,
{
    let feed = repo
        .next_feed_to_fetch(user.id)
        .await?
        .ok_or_else(|| Error::NothingToFetch(user.name.clone()))?;

    ingest_feed(repo, fetcher, &feed, out).await
}

/// Fetch a feed, store its new items as posts, mark it fetched and report
///
/// Fetch, parse and mark-fetched failures abort the cycle. Items with an
/// unparseable date or a failed insert are skipped; already stored URLs are
/// skipped silently.
pub async fn ingest_feed<W>(
    repo: &dyn Repository,
    fetcher: &dyn FetchFeed,
    feed: &Feed,
    out: &mut W,
) -> Result<CycleReport>
where
    W: Write + Send + ?Sized,
{
    write!(out, "Fetching {}...\n\n", feed.name)?;

    let mut doc = fetcher.fetch(&feed.url).await?;
    doc.normalize();

    let mut report = CycleReport {
        feed_name: feed.name.clone(),
        ..CycleReport::default()
    };

    for item in doc.items.iter_mut() {
        match store_item(repo, feed, item).await {
            ItemOutcome::Stored => report.inserted += 1,
            ItemOutcome::Duplicate => {
                item.skip = true;
                report.duplicates += 1;
            }
            ItemOutcome::Failed => {
                item.skip = true;
                report.failed += 1;
            }
        }
    }

    repo.mark_feed_fetched(feed.id, Utc::now()).await?;

    doc.render(out)?;

    tracing::info!(
        "Feed '{}': {} new, {} already stored, {} skipped",
        feed.name,
        report.inserted,
        report.duplicates,
        report.failed
    );

    Ok(report)
}

async fn store_item(repo: &dyn Repository, feed: &Feed, item: &FeedItem) -> ItemOutcome {
    if item.link.trim().is_empty() {
        tracing::warn!(feed = %feed.name, title = %item.title, "Skipping item without a link");
        return ItemOutcome::Failed;
    }

    let published_at = match parse_pub_date(&item.pub_date) {
        Ok(published_at) => published_at,
        Err(e) => {
            tracing::warn!(
                link = %item.link,
                pub_date = %item.pub_date,
                "Skipping item with unparseable date: {}",
                e
            );
            return ItemOutcome::Failed;
        }
    };

    let post = Post {
        id: Uuid::new_v4(),
        title: item.title.clone(),
        description: item.description.clone(),
        url: item.link.clone(),
        published_at,
        feed_id: feed.id,
        created_at: Utc::now(),
    };

    match repo.create_post(&post).await {
        Ok(_) => ItemOutcome::Stored,
        Err(Error::DuplicatePost(_)) => ItemOutcome::Duplicate,
        Err(e) => {
            tracing::warn!(link = %item.link, "Failed to store post: {}", e);
            ItemOutcome::Failed
        }
    }
}
