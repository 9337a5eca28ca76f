use std::io::Write;

use async_trait::async_trait;

use gator_core::models::{FeedFollow, User};
use gator_core::{Command, Result, State, UserCommandHandler};

/// `follow <url>`: follow an existing feed
pub struct Follow;

#[async_trait]
impl UserCommandHandler for Follow {
    async fn handle(&self, state: &mut State, cmd: &Command, user: &User) -> Result<()> {
        let args = cmd.expect_args(1, "follow <url>")?;

        let feed = state.repo.get_feed_by_url(args[0].trim()).await?;
        let follow = state
            .repo
            .create_feed_follow(&FeedFollow::new(user.id, feed.id))
            .await?;

        writeln!(state.out, "{} followed {}", follow.user_name, follow.feed_name)?;
        Ok(())
    }
}
