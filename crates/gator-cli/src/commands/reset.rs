use std::io::Write;

use async_trait::async_trait;

use gator_core::{Command, CommandHandler, Result, State};

/// `reset`: delete every user, cascading to feeds, follows and posts
pub struct Reset;

#[async_trait]
impl CommandHandler for Reset {
    async fn handle(&self, state: &mut State, _cmd: &Command) -> Result<()> {
        let deleted = state.repo.delete_all_users().await?;
        tracing::info!("Reset removed {} users", deleted);

        writeln!(state.out, "Users reset ({} deleted)", deleted)?;
        Ok(())
    }
}
