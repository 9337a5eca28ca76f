use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{is_unique_violation, Database};
use crate::models::Post;
use crate::{Error, Result};

/// Repository for ingested posts
pub struct PostRepository<'a> {
    db: &'a Database,
}

#[derive(FromRow)]
struct PostRow {
    id: String,
    created_at: DateTime<Utc>,
    title: String,
    description: String,
    url: String,
    published_at: DateTime<Utc>,
    feed_id: String,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            title: row.title,
            description: row.description,
            url: row.url,
            published_at: row.published_at,
            feed_id: Uuid::parse_str(&row.feed_id).unwrap_or_default(),
            created_at: row.created_at,
        }
    }
}

impl<'a> PostRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a post; the URL must not already be stored
    pub async fn create(&self, post: &Post) -> Result<Post> {
        let result = sqlx::query(
            r#"
            INSERT INTO posts (id, created_at, title, description, url, published_at, feed_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(post.id.to_string())
        .bind(post.created_at)
        .bind(&post.title)
        .bind(&post.description)
        .bind(&post.url)
        .bind(post.published_at)
        .bind(post.feed_id.to_string())
        .execute(self.db.pool())
        .await;

        match result {
            Ok(_) => Ok(post.clone()),
            Err(e) if is_unique_violation(&e) => Err(Error::DuplicatePost(post.url.clone())),
            Err(e) => Err(e.into()),
        }
    }

    /// Posts from the feeds a user follows, newest first
    pub async fn list_for_user(&self, user_id: Uuid, limit: u32, offset: u32) -> Result<Vec<Post>> {
        let rows: Vec<PostRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.created_at, p.title, p.description, p.url, p.published_at, p.feed_id
            FROM posts p
            JOIN feed_follows ff ON ff.feed_id = p.feed_id
            WHERE ff.user_id = ?
            ORDER BY p.published_at DESC, p.created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    pub async fn count_for_feed(&self, feed_id: Uuid) -> Result<u64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE feed_id = ?")
            .bind(feed_id.to_string())
            .fetch_one(self.db.pool())
            .await?;

        Ok(count.0 as u64)
    }
}
