use std::io::Write;

use async_trait::async_trait;
use url::Url;

use gator_core::models::{Feed, FeedFollow, User};
use gator_core::{Command, Error, Result, State, UserCommandHandler};

const USAGE: &str = "usage: addfeed <name> <url>";

/// `addfeed <name> <url>`: create a feed owned by the user and follow it
pub struct AddFeed;

#[async_trait]
impl UserCommandHandler for AddFeed {
    async fn handle(&self, state: &mut State, cmd: &Command, user: &User) -> Result<()> {
        let args = cmd.expect_args(2, "addfeed <name> <url>")?;
        let name = args[0].trim();
        if name.is_empty() {
            return Err(Error::Usage(USAGE.to_string()));
        }

        let url = args[1].trim();
        let parsed = Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Usage(format!(
                "{}: unsupported URL scheme '{}'",
                USAGE,
                parsed.scheme()
            )));
        }

        let feed = state.repo.add_feed(&Feed::new(name, url, user.id)).await?;
        writeln!(state.out, "Added feed {} ({})", feed.name, feed.url)?;

        let follow = state
            .repo
            .create_feed_follow(&FeedFollow::new(user.id, feed.id))
            .await?;
        writeln!(state.out, "{} followed {}", follow.user_name, follow.feed_name)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gator_core::storage::Repository;

    use super::*;
    use crate::commands::testing::Harness;

    #[tokio::test]
    async fn test_addfeed_follows_automatically() {
        let mut h = Harness::new().await;
        h.run("register", &["alice"]).await.unwrap();

        let output = h
            .run("addfeed", &["Blog", "http://example.com/rss"])
            .await
            .unwrap();

        assert_eq!(
            output,
            "Added feed Blog (http://example.com/rss)\nalice followed Blog\n"
        );
        let alice = h.db.get_user("alice").await.unwrap();
        let following = h.db.list_following(alice.id).await.unwrap();
        assert_eq!(following.len(), 1);
        assert_eq!(following[0].feed_name, "Blog");
    }

    #[tokio::test]
    async fn test_addfeed_is_case_insensitive_command() {
        let mut h = Harness::new().await;
        h.run("register", &["alice"]).await.unwrap();

        h.run("addFeed", &["Blog", "https://example.com/rss"])
            .await
            .unwrap();

        assert_eq!(h.db.list_feeds().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_addfeed_duplicate_url() {
        let mut h = Harness::new().await;
        h.run("register", &["alice"]).await.unwrap();
        h.run("addfeed", &["Blog", "http://example.com/rss"])
            .await
            .unwrap();

        let result = h.run("addfeed", &["Again", "http://example.com/rss"]).await;

        assert!(matches!(result, Err(Error::FeedExists(_))));
        assert_eq!(h.db.list_feeds().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_addfeed_validates_arguments() {
        let mut h = Harness::new().await;
        h.run("register", &["alice"]).await.unwrap();

        assert!(matches!(
            h.run("addfeed", &["Blog"]).await,
            Err(Error::Usage(msg)) if msg == USAGE
        ));
        assert!(matches!(
            h.run("addfeed", &["Blog", "not a url"]).await,
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            h.run("addfeed", &["Blog", "ftp://example.com/rss"]).await,
            Err(Error::Usage(_))
        ));
        assert!(h.db.list_feeds().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_addfeed_requires_login() {
        let mut h = Harness::new().await;

        let result = h.run("addfeed", &["Blog", "http://example.com/rss"]).await;

        assert!(matches!(result, Err(Error::NotLoggedIn)));
        assert!(h.db.list_feeds().await.unwrap().is_empty());
    }
}
