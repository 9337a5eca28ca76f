//! In-process repository used by tests that run on a paused tokio clock,
//! where SQLite's worker thread would let the clock auto-advance mid-query.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Repository;
use crate::models::{Feed, FeedFollow, FollowDetails, FollowedFeed, Post, User};
use crate::{Error, Result};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    feeds: Vec<Feed>,
    follows: Vec<FeedFollow>,
    posts: Vec<Post>,
}

#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
    /// Makes `mark_feed_fetched` fail, to exercise fatal cycle errors
    pub fail_mark_fetched: std::sync::atomic::AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn feed(&self, id: Uuid) -> Option<Feed> {
        self.tables().feeds.iter().find(|f| f.id == id).cloned()
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_user(&self, name: &str) -> Result<User> {
        self.tables()
            .users
            .iter()
            .find(|u| u.name == name)
            .cloned()
            .ok_or_else(|| Error::UserNotFound(name.to_string()))
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<User> {
        self.tables()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| Error::UserNotFound(id.to_string()))
    }

    async fn create_user(&self, user: &User) -> Result<User> {
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.name == user.name) {
            return Err(Error::UserExists(user.name.clone()));
        }
        tables.users.push(user.clone());
        Ok(user.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.tables().users.clone())
    }

    async fn delete_all_users(&self) -> Result<u64> {
        let mut tables = self.tables();
        let count = tables.users.len() as u64;
        *tables = Tables::default();
        Ok(count)
    }

    async fn add_feed(&self, feed: &Feed) -> Result<Feed> {
        let mut tables = self.tables();
        if tables.feeds.iter().any(|f| f.url == feed.url) {
            return Err(Error::FeedExists(feed.url.clone()));
        }
        tables.feeds.push(feed.clone());
        Ok(feed.clone())
    }

    async fn get_feed_by_url(&self, url: &str) -> Result<Feed> {
        self.tables()
            .feeds
            .iter()
            .find(|f| f.url == url)
            .cloned()
            .ok_or_else(|| Error::FeedNotFound(url.to_string()))
    }

    async fn list_feeds(&self) -> Result<Vec<Feed>> {
        Ok(self.tables().feeds.clone())
    }

    async fn next_feed_to_fetch(&self, user_id: Uuid) -> Result<Option<Feed>> {
        let tables = self.tables();
        let followed = tables.feeds.iter().filter(|f| {
            tables
                .follows
                .iter()
                .any(|ff| ff.user_id == user_id && ff.feed_id == f.id)
        });
        // min_by_key keeps the first of equal keys; None sorts before Some
        Ok(followed.min_by_key(|f| f.last_fetched_at).cloned())
    }

    async fn mark_feed_fetched(&self, feed_id: Uuid, fetched_at: DateTime<Utc>) -> Result<()> {
        if self
            .fail_mark_fetched
            .load(std::sync::atomic::Ordering::SeqCst)
        {
            return Err(Error::Io(std::io::Error::other("disk full")));
        }
        let mut tables = self.tables();
        let feed = tables
            .feeds
            .iter_mut()
            .find(|f| f.id == feed_id)
            .ok_or_else(|| Error::FeedNotFound(feed_id.to_string()))?;
        feed.last_fetched_at = Some(fetched_at);
        Ok(())
    }

    async fn create_feed_follow(&self, follow: &FeedFollow) -> Result<FollowDetails> {
        let mut tables = self.tables();
        let user_name = tables
            .users
            .iter()
            .find(|u| u.id == follow.user_id)
            .map(|u| u.name.clone())
            .ok_or_else(|| Error::UserNotFound(follow.user_id.to_string()))?;
        let feed_name = tables
            .feeds
            .iter()
            .find(|f| f.id == follow.feed_id)
            .map(|f| f.name.clone())
            .ok_or_else(|| Error::FeedNotFound(follow.feed_id.to_string()))?;

        if tables
            .follows
            .iter()
            .any(|ff| ff.user_id == follow.user_id && ff.feed_id == follow.feed_id)
        {
            return Err(Error::AlreadyFollowing {
                user: user_name,
                feed: feed_name,
            });
        }
        tables.follows.push(follow.clone());
        Ok(FollowDetails {
            user_name,
            feed_name,
        })
    }

    async fn remove_follow(&self, user_id: Uuid, feed_id: Uuid) -> Result<bool> {
        let mut tables = self.tables();
        let before = tables.follows.len();
        tables
            .follows
            .retain(|ff| !(ff.user_id == user_id && ff.feed_id == feed_id));
        Ok(tables.follows.len() < before)
    }

    async fn list_following(&self, user_id: Uuid) -> Result<Vec<FollowedFeed>> {
        let tables = self.tables();
        Ok(tables
            .follows
            .iter()
            .filter(|ff| ff.user_id == user_id)
            .filter_map(|ff| tables.feeds.iter().find(|f| f.id == ff.feed_id))
            .map(|f| FollowedFeed {
                feed_id: f.id,
                feed_name: f.name.clone(),
                feed_url: f.url.clone(),
            })
            .collect())
    }

    async fn create_post(&self, post: &Post) -> Result<Post> {
        let mut tables = self.tables();
        if tables.posts.iter().any(|p| p.url == post.url) {
            return Err(Error::DuplicatePost(post.url.clone()));
        }
        tables.posts.push(post.clone());
        Ok(post.clone())
    }

    async fn list_posts(&self, user_id: Uuid, limit: u32, offset: u32) -> Result<Vec<Post>> {
        let tables = self.tables();
        let mut posts: Vec<Post> = tables
            .posts
            .iter()
            .filter(|p| {
                tables
                    .follows
                    .iter()
                    .any(|ff| ff.user_id == user_id && ff.feed_id == p.feed_id)
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_posts(&self, feed_id: Uuid) -> Result<u64> {
        Ok(self
            .tables()
            .posts
            .iter()
            .filter(|p| p.feed_id == feed_id)
            .count() as u64)
    }
}
