use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered user; names are unique and case-sensitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A followable feed, unique by URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl Feed {
    pub fn new(name: impl Into<String>, url: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            url: url.into(),
            user_id,
            created_at: Utc::now(),
            last_fetched_at: None,
        }
    }
}

/// Link between a user and a feed they follow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedFollow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub feed_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl FeedFollow {
    pub fn new(user_id: Uuid, feed_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            feed_id,
            created_at: Utc::now(),
        }
    }
}

/// Names returned after a follow is created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowDetails {
    pub user_name: String,
    pub feed_name: String,
}

/// A feed as seen from a follower's list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowedFeed {
    pub feed_id: Uuid,
    pub feed_name: String,
    pub feed_url: String,
}

/// An ingested feed item, unique by URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub feed_id: Uuid,
    pub created_at: DateTime<Utc>,
}
