//! Command registry and dispatcher.
//!
//! Handlers come in two shapes: plain handlers that only need the [`State`],
//! and handlers that act on behalf of the logged-in [`User`]. The latter are
//! always registered behind [`crate::auth::RequireUser`].

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::RequireUser;
use crate::feed::FetchFeed;
use crate::models::User;
use crate::session::Session;
use crate::storage::Repository;
use crate::{Error, Result};

/// A parsed invocation: command name plus positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Return the arguments, or a usage error when fewer than `count` were given
    pub fn expect_args(&self, count: usize, usage: &str) -> Result<&[String]> {
        if self.args.len() < count {
            return Err(Error::Usage(format!("usage: {}", usage)));
        }
        Ok(&self.args)
    }
}

/// Everything a handler may touch, passed explicitly on every invocation
pub struct State {
    pub repo: Arc<dyn Repository>,
    pub fetcher: Arc<dyn FetchFeed>,
    pub session: Session,
    /// Command output (stdout in the binary, a buffer in tests)
    pub out: Box<dyn Write + Send + Sync>,
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, state: &mut State, cmd: &Command) -> Result<()>;
}

#[async_trait]
pub trait UserCommandHandler: Send + Sync {
    async fn handle(&self, state: &mut State, cmd: &Command, user: &User) -> Result<()>;
}

#[async_trait]
impl<T: UserCommandHandler + ?Sized> UserCommandHandler for Box<T> {
    async fn handle(&self, state: &mut State, cmd: &Command, user: &User) -> Result<()> {
        (**self).handle(state, cmd, user).await
    }
}

/// A registered handler
pub enum Handler {
    Plain(Box<dyn CommandHandler>),
    LoggedIn(RequireUser<Box<dyn UserCommandHandler>>),
}

impl Handler {
    pub fn plain(handler: impl CommandHandler + 'static) -> Self {
        Handler::Plain(Box::new(handler))
    }

    pub fn logged_in(handler: impl UserCommandHandler + 'static) -> Self {
        let boxed: Box<dyn UserCommandHandler> = Box::new(handler);
        Handler::LoggedIn(RequireUser::new(boxed))
    }

    async fn invoke(&self, state: &mut State, cmd: &Command) -> Result<()> {
        match self {
            Handler::Plain(handler) => handler.handle(state, cmd).await,
            Handler::LoggedIn(handler) => handler.handle(state, cmd).await,
        }
    }
}

/// Case-insensitive map from command name to handler
#[derive(Default)]
pub struct Commands {
    handlers: HashMap<String, Handler>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &str, handler: Handler) {
        self.handlers.insert(name.to_lowercase(), handler);
    }

    /// Registered command names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up the handler for `cmd` and run it, propagating its result unchanged
    pub async fn run(&self, state: &mut State, cmd: &Command) -> Result<()> {
        let name = cmd.name.to_lowercase();
        let handler = self
            .handlers
            .get(&name)
            .ok_or_else(|| Error::UnknownCommand(cmd.name.clone()))?;

        tracing::debug!(command = %name, args = ?cmd.args, "Dispatching command");
        handler.invoke(state, cmd).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::config::AppConfig;
    use crate::feed::FeedDocument;
    use crate::storage::memory::MemoryRepository;

    /// Cloneable in-memory sink for handler output
    #[derive(Clone, Default)]
    pub(crate) struct SharedBuffer(pub Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct NoFetch;

    #[async_trait]
    impl FetchFeed for NoFetch {
        async fn fetch(&self, url: &str) -> Result<FeedDocument> {
            Err(Error::Fetch(format!("unexpected fetch of {}", url)))
        }
    }

    pub(crate) fn state_with(repo: Arc<dyn Repository>, user: Option<&str>) -> (State, SharedBuffer) {
        let mut config = AppConfig::default();
        config.session.current_user_name = user.map(str::to_string);
        let out = SharedBuffer::default();
        let state = State {
            repo,
            fetcher: Arc::new(NoFetch),
            session: Session::new(config, "unused.toml"),
            out: Box::new(out.clone()),
        };
        (state, out)
    }

    struct Counter(Arc<AtomicUsize>);

    #[async_trait]
    impl CommandHandler for Counter {
        async fn handle(&self, state: &mut State, cmd: &Command) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            writeln!(state.out, "ran {} {:?}", cmd.name, cmd.args)?;
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl CommandHandler for Failing {
        async fn handle(&self, _state: &mut State, _cmd: &Command) -> Result<()> {
            Err(Error::Usage("usage: fail <thing>".to_string()))
        }
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut commands = Commands::new();
        commands.register("addFeed", Handler::plain(Counter(calls.clone())));

        let (mut state, out) = state_with(Arc::new(MemoryRepository::new()), None);
        commands
            .run(&mut state, &Command::new("ADDFEED", vec!["x".into()]))
            .await
            .unwrap();
        commands
            .run(&mut state, &Command::new("addfeed", Vec::new()))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(out.contents().contains("ran ADDFEED [\"x\"]"));
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let commands = Commands::new();
        let (mut state, _) = state_with(Arc::new(MemoryRepository::new()), None);

        let result = commands.run(&mut state, &Command::new("frobnicate", Vec::new())).await;
        assert!(matches!(result, Err(Error::UnknownCommand(name)) if name == "frobnicate"));
    }

    #[tokio::test]
    async fn test_handler_error_propagates_unchanged() {
        let mut commands = Commands::new();
        commands.register("fail", Handler::plain(Failing));
        let (mut state, _) = state_with(Arc::new(MemoryRepository::new()), None);

        let result = commands.run(&mut state, &Command::new("fail", Vec::new())).await;
        assert!(matches!(result, Err(Error::Usage(msg)) if msg == "usage: fail <thing>"));
    }

    #[test]
    fn test_names_are_sorted_and_lowercase() {
        let mut commands = Commands::new();
        commands.register("users", Handler::plain(Failing));
        commands.register("addFeed", Handler::plain(Failing));
        commands.register("agg", Handler::plain(Failing));

        assert_eq!(commands.names(), ["addfeed", "agg", "users"]);
    }

    #[test]
    fn test_expect_args() {
        let cmd = Command::new("follow", vec!["https://example.com/rss".into()]);

        assert_eq!(cmd.expect_args(1, "follow <url>").unwrap().len(), 1);
        assert!(matches!(
            cmd.expect_args(2, "addfeed <name> <url>"),
            Err(Error::Usage(msg)) if msg == "usage: addfeed <name> <url>"
        ));
    }
}
