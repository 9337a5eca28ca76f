//! Login middleware: resolves the session's user before a handler runs.

use async_trait::async_trait;

use crate::command::{Command, CommandHandler, State, UserCommandHandler};
use crate::models::User;
use crate::{Error, Result};

/// Resolve the logged-in user recorded in the session against the repository
pub async fn current_user(state: &State) -> Result<User> {
    let name = state.session.current_user_name().ok_or(Error::NotLoggedIn)?;
    state.repo.get_user(name).await
}

/// Wraps a user-scoped handler into a plain one that requires a login
pub struct RequireUser<H> {
    inner: H,
}

impl<H: UserCommandHandler> RequireUser<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<H: UserCommandHandler> CommandHandler for RequireUser<H> {
    async fn handle(&self, state: &mut State, cmd: &Command) -> Result<()> {
        let user = current_user(state).await?;
        tracing::debug!(user = %user.name, command = %cmd.name, "Resolved current user");
        self.inner.handle(state, cmd, &user).await
    }
}
