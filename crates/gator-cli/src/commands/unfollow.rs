use std::io::Write;

use async_trait::async_trait;

use gator_core::models::User;
use gator_core::{Command, Error, Result, State, UserCommandHandler};

/// `unfollow <url>`: stop following a feed
pub struct Unfollow;

#[async_trait]
impl UserCommandHandler for Unfollow {
    async fn handle(&self, state: &mut State, cmd: &Command, user: &User) -> Result<()> {
        let args = cmd.expect_args(1, "unfollow <url>")?;

        let feed = state.repo.get_feed_by_url(args[0].trim()).await?;
        if !state.repo.remove_follow(user.id, feed.id).await? {
            return Err(Error::NotFollowing {
                user: user.name.clone(),
                feed: feed.name,
            });
        }

        writeln!(state.out, "{} unfollowed {}", user.name, feed.name)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gator_core::Error;

    use crate::commands::testing::Harness;

    #[tokio::test]
    async fn test_unfollow_scenario() {
        let mut h = Harness::new().await;
        h.run("register", &["alice"]).await.unwrap();
        h.run("addfeed", &["Blog", "http://example.com/rss"])
            .await
            .unwrap();
        assert_eq!(h.run("following", &[]).await.unwrap(), "* Blog\n");

        let output = h.run("unfollow", &["http://example.com/rss"]).await.unwrap();

        assert_eq!(output, "alice unfollowed Blog\n");
        assert_eq!(
            h.run("following", &[]).await.unwrap(),
            "alice is not following any feeds\n"
        );
    }

    #[tokio::test]
    async fn test_unfollow_not_followed() {
        let mut h = Harness::new().await;
        h.run("register", &["alice"]).await.unwrap();
        h.run("addfeed", &["Blog", "http://example.com/rss"])
            .await
            .unwrap();
        h.run("register", &["bob"]).await.unwrap();

        let result = h.run("unfollow", &["http://example.com/rss"]).await;

        assert!(matches!(
            result,
            Err(Error::NotFollowing { user, feed }) if user == "bob" && feed == "Blog"
        ));
    }

    #[tokio::test]
    async fn test_unfollow_requires_url() {
        let mut h = Harness::new().await;
        h.run("register", &["alice"]).await.unwrap();

        assert!(matches!(h.run("unfollow", &[]).await, Err(Error::Usage(_))));
    }
}
