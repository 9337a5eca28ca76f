use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Feed, FeedFollow, FollowDetails, FollowedFeed, Post, User};
use crate::Result;

/// Data access used by the command handlers, the ingestion pipeline and the scheduler
///
/// Uniqueness conflicts are reported with typed errors (`UserExists`,
/// `FeedExists`, `AlreadyFollowing`, `DuplicatePost`) so callers never need to
/// inspect driver messages.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Look up a user by exact name; `UserNotFound` if absent
    async fn get_user(&self, name: &str) -> Result<User>;

    async fn get_user_by_id(&self, id: Uuid) -> Result<User>;

    async fn create_user(&self, user: &User) -> Result<User>;

    async fn list_users(&self) -> Result<Vec<User>>;

    /// Remove every user; feeds, follows and posts go with them
    async fn delete_all_users(&self) -> Result<u64>;

    async fn add_feed(&self, feed: &Feed) -> Result<Feed>;

    /// Look up a feed by URL; `FeedNotFound` if absent
    async fn get_feed_by_url(&self, url: &str) -> Result<Feed>;

    async fn list_feeds(&self) -> Result<Vec<Feed>>;

    /// The followed feed fetched longest ago, never-fetched feeds first
    async fn next_feed_to_fetch(&self, user_id: Uuid) -> Result<Option<Feed>>;

    async fn mark_feed_fetched(&self, feed_id: Uuid, fetched_at: DateTime<Utc>) -> Result<()>;

    async fn create_feed_follow(&self, follow: &FeedFollow) -> Result<FollowDetails>;

    /// Returns false when no such follow existed
    async fn remove_follow(&self, user_id: Uuid, feed_id: Uuid) -> Result<bool>;

    async fn list_following(&self, user_id: Uuid) -> Result<Vec<FollowedFeed>>;

    /// Insert a post; `DuplicatePost` if its URL is already stored
    async fn create_post(&self, post: &Post) -> Result<Post>;

    /// Posts from feeds the user follows, most recently published first
    async fn list_posts(&self, user_id: Uuid, limit: u32, offset: u32) -> Result<Vec<Post>>;

    async fn count_posts(&self, feed_id: Uuid) -> Result<u64>;
}
