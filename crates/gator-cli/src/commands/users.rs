use std::io::Write;

use async_trait::async_trait;

use gator_core::{Command, CommandHandler, Result, State};

/// `users`: list every user, marking the logged-in one
pub struct Users;

#[async_trait]
impl CommandHandler for Users {
    async fn handle(&self, state: &mut State, _cmd: &Command) -> Result<()> {
        let users = state.repo.list_users().await?;
        let current = state.session.current_user_name();

        for user in &users {
            if current == Some(user.name.as_str()) {
                writeln!(state.out, "* {} (current)", user.name)?;
            } else {
                writeln!(state.out, "* {}", user.name)?;
            }
        }

        Ok(())
    }
}
