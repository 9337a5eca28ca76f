use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Database, FeedRepository, PostRepository, Repository, UserRepository};
use crate::models::{Feed, FeedFollow, FollowDetails, FollowedFeed, Post, User};
use crate::Result;

#[async_trait]
impl Repository for Database {
    async fn get_user(&self, name: &str) -> Result<User> {
        UserRepository::new(self).find_by_name(name).await
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<User> {
        UserRepository::new(self).find_by_id(id).await
    }

    async fn create_user(&self, user: &User) -> Result<User> {
        UserRepository::new(self).create(user).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        UserRepository::new(self).list_all().await
    }

    async fn delete_all_users(&self) -> Result<u64> {
        UserRepository::new(self).delete_all().await
    }

    async fn add_feed(&self, feed: &Feed) -> Result<Feed> {
        FeedRepository::new(self).create(feed).await
    }

    async fn get_feed_by_url(&self, url: &str) -> Result<Feed> {
        FeedRepository::new(self).find_by_url(url).await
    }

    async fn list_feeds(&self) -> Result<Vec<Feed>> {
        FeedRepository::new(self).list_all().await
    }

    async fn next_feed_to_fetch(&self, user_id: Uuid) -> Result<Option<Feed>> {
        FeedRepository::new(self).next_to_fetch(user_id).await
    }

    async fn mark_feed_fetched(&self, feed_id: Uuid, fetched_at: DateTime<Utc>) -> Result<()> {
        FeedRepository::new(self).mark_fetched(feed_id, fetched_at).await
    }

    async fn create_feed_follow(&self, follow: &FeedFollow) -> Result<FollowDetails> {
        FeedRepository::new(self).create_follow(follow).await
    }

    async fn remove_follow(&self, user_id: Uuid, feed_id: Uuid) -> Result<bool> {
        FeedRepository::new(self).remove_follow(user_id, feed_id).await
    }

    async fn list_following(&self, user_id: Uuid) -> Result<Vec<FollowedFeed>> {
        FeedRepository::new(self).list_following(user_id).await
    }

    async fn create_post(&self, post: &Post) -> Result<Post> {
        PostRepository::new(self).create(post).await
    }

    async fn list_posts(&self, user_id: Uuid, limit: u32, offset: u32) -> Result<Vec<Post>> {
        PostRepository::new(self).list_for_user(user_id, limit, offset).await
    }

    async fn count_posts(&self, feed_id: Uuid) -> Result<u64> {
        PostRepository::new(self).count_for_feed(feed_id).await
    }
}
