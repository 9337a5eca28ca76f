use std::io::Write;

use async_trait::async_trait;

use gator_core::{Command, CommandHandler, Result, State};

/// `login <name>`: switch the session to an existing user
pub struct Login;

#[async_trait]
impl CommandHandler for Login {
    async fn handle(&self, state: &mut State, cmd: &Command) -> Result<()> {
        let args = cmd.expect_args(1, "login <name>")?;

        let user = state.repo.get_user(&args[0]).await?;
        state.session.set_user(&user.name)?;

        writeln!(state.out, "Logged in as {}", user.name)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gator_core::Error;

    use crate::commands::testing::Harness;

    #[tokio::test]
    async fn test_login_switches_user() {
        let mut h = Harness::new().await;
        h.run("register", &["alice"]).await.unwrap();
        h.run("register", &["bob"]).await.unwrap();

        let output = h.run("login", &["alice"]).await.unwrap();

        assert_eq!(output, "Logged in as alice\n");
        assert_eq!(h.state.session.current_user_name(), Some("alice"));
    }

    #[tokio::test]
    async fn test_login_unknown_user() {
        let mut h = Harness::new().await;
        h.run("register", &["alice"]).await.unwrap();

        let result = h.run("login", &["Alice"]).await;

        assert!(matches!(result, Err(Error::UserNotFound(name)) if name == "Alice"));
        assert_eq!(h.state.session.current_user_name(), Some("alice"));
    }

    #[tokio::test]
    async fn test_login_requires_name() {
        let mut h = Harness::new().await;
        assert!(matches!(h.run("login", &[]).await, Err(Error::Usage(_))));
    }
}
