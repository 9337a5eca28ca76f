use std::io::Write;

use async_trait::async_trait;

use gator_core::models::User;
use gator_core::{Command, CommandHandler, Error, Result, State};

/// `register <name>`: create a user and log in as them
pub struct Register;

#[async_trait]
impl CommandHandler for Register {
    async fn handle(&self, state: &mut State, cmd: &Command) -> Result<()> {
        let args = cmd.expect_args(1, "register <name>")?;
        let name = args[0].trim();
        if name.is_empty() {
            return Err(Error::Usage("usage: register <name>".to_string()));
        }

        let user = state.repo.create_user(&User::new(name)).await?;
        state.session.set_user(&user.name)?;

        writeln!(state.out, "User {} was created", user.name)?;
        writeln!(state.out, "  id:      {}", user.id)?;
        writeln!(
            state.out,
            "  created: {}",
            user.created_at.format("%Y-%m-%d %H:%M:%S")
        )?;

        Ok(())
    }
}
