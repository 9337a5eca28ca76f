use std::io::Write;

use async_trait::async_trait;

use gator_core::models::User;
use gator_core::{Command, Result, State, UserCommandHandler};

/// `following`: names of the feeds the user follows
pub struct Following;

#[async_trait]
impl UserCommandHandler for Following {
    async fn handle(&self, state: &mut State, _cmd: &Command, user: &User) -> Result<()> {
        let following = state.repo.list_following(user.id).await?;

        if following.is_empty() {
            writeln!(state.out, "{} is not following any feeds", user.name)?;
            return Ok(());
        }

        for feed in &following {
            writeln!(state.out, "* {}", feed.feed_name)?;
        }

        Ok(())
    }
}
