use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{is_unique_violation, Database};
use crate::models::{Feed, FeedFollow, FollowDetails, FollowedFeed};
use crate::{Error, Result};

/// Repository for feeds and the follows that link them to users
pub struct FeedRepository<'a> {
    db: &'a Database,
}

#[derive(FromRow)]
struct FeedRow {
    id: String,
    name: String,
    url: String,
    user_id: String,
    created_at: DateTime<Utc>,
    last_fetched_at: Option<DateTime<Utc>>,
}

impl From<FeedRow> for Feed {
    fn from(row: FeedRow) -> Self {
        Feed {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            name: row.name,
            url: row.url,
            user_id: Uuid::parse_str(&row.user_id).unwrap_or_default(),
            created_at: row.created_at,
            last_fetched_at: row.last_fetched_at,
        }
    }
}

#[derive(FromRow)]
struct FollowDetailsRow {
    user_name: String,
    feed_name: String,
}

#[derive(FromRow)]
struct FollowedFeedRow {
    feed_id: String,
    feed_name: String,
    feed_url: String,
}

impl<'a> FeedRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new feed
    pub async fn create(&self, feed: &Feed) -> Result<Feed> {
        let result = sqlx::query(
            r#"
            INSERT INTO feeds (id, created_at, name, url, user_id, last_fetched_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(feed.id.to_string())
        .bind(feed.created_at)
        .bind(&feed.name)
        .bind(&feed.url)
        .bind(feed.user_id.to_string())
        .bind(feed.last_fetched_at)
        .execute(self.db.pool())
        .await;

        match result {
            Ok(_) => self.find_by_url(&feed.url).await,
            Err(e) if is_unique_violation(&e) => Err(Error::FeedExists(feed.url.clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// Find a feed by URL
    pub async fn find_by_url(&self, url: &str) -> Result<Feed> {
        let row: Option<FeedRow> = sqlx::query_as(
            r#"
            SELECT id, name, url, user_id, created_at, last_fetched_at
            FROM feeds
            WHERE url = ?
            "#,
        )
        .bind(url)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(Feed::from)
            .ok_or_else(|| Error::FeedNotFound(url.to_string()))
    }

    /// Get all feeds in creation order
    pub async fn list_all(&self) -> Result<Vec<Feed>> {
        let rows: Vec<FeedRow> = sqlx::query_as(
            r#"
            SELECT id, name, url, user_id, created_at, last_fetched_at
            FROM feeds
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Feed::from).collect())
    }

    /// The feed followed by `user_id` that was fetched longest ago
    pub async fn next_to_fetch(&self, user_id: Uuid) -> Result<Option<Feed>> {
        let row: Option<FeedRow> = sqlx::query_as(
            r#"
            SELECT f.id, f.name, f.url, f.user_id, f.created_at, f.last_fetched_at
            FROM feeds f
            JOIN feed_follows ff ON ff.feed_id = f.id
            WHERE ff.user_id = ?
            ORDER BY f.last_fetched_at ASC NULLS FIRST, f.created_at ASC, f.rowid ASC
            LIMIT 1
            "#,
        )
        .bind(user_id.to_string())
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Feed::from))
    }

    pub async fn mark_fetched(&self, id: Uuid, fetched_at: DateTime<Utc>) -> Result<()> {
        let result = sqlx::query("UPDATE feeds SET last_fetched_at = ? WHERE id = ?")
            .bind(fetched_at)
            .bind(id.to_string())
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::FeedNotFound(id.to_string()));
        }
        Ok(())
    }

    /// Follow a feed, returning the user and feed names
    pub async fn create_follow(&self, follow: &FeedFollow) -> Result<FollowDetails> {
        let result = sqlx::query(
            r#"
            INSERT INTO feed_follows (id, created_at, user_id, feed_id)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(follow.id.to_string())
        .bind(follow.created_at)
        .bind(follow.user_id.to_string())
        .bind(follow.feed_id.to_string())
        .execute(self.db.pool())
        .await;

        match result {
            Ok(_) => self.follow_details(follow.user_id, follow.feed_id).await,
            Err(e) if is_unique_violation(&e) => {
                let details = self.follow_details(follow.user_id, follow.feed_id).await?;
                Err(Error::AlreadyFollowing {
                    user: details.user_name,
                    feed: details.feed_name,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn follow_details(&self, user_id: Uuid, feed_id: Uuid) -> Result<FollowDetails> {
        let row: FollowDetailsRow = sqlx::query_as(
            r#"
            SELECT u.name AS user_name, f.name AS feed_name
            FROM users u, feeds f
            WHERE u.id = ? AND f.id = ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(feed_id.to_string())
        .fetch_one(self.db.pool())
        .await?;

        Ok(FollowDetails {
            user_name: row.user_name,
            feed_name: row.feed_name,
        })
    }

    pub async fn remove_follow(&self, user_id: Uuid, feed_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM feed_follows WHERE user_id = ? AND feed_id = ?")
            .bind(user_id.to_string())
            .bind(feed_id.to_string())
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_following(&self, user_id: Uuid) -> Result<Vec<FollowedFeed>> {
        let rows: Vec<FollowedFeedRow> = sqlx::query_as(
            r#"
            SELECT f.id AS feed_id, f.name AS feed_name, f.url AS feed_url
            FROM feed_follows ff
            JOIN feeds f ON f.id = ff.feed_id
            WHERE ff.user_id = ?
            ORDER BY ff.created_at ASC, ff.rowid ASC
            "#,
        )
        .bind(user_id.to_string())
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| FollowedFeed {
                feed_id: Uuid::parse_str(&row.feed_id).unwrap_or_default(),
                feed_name: row.feed_name,
                feed_url: row.feed_url,
            })
            .collect())
    }
}
