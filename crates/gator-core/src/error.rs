use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("{0}")]
    Usage(String),

    #[error("Invalid duration '{0}': expected a positive interval such as 30s, 1m or 1h30m")]
    InvalidDuration(String),

    #[error("command \"{0}\" doesn't exist")]
    UnknownCommand(String),

    #[error("Not logged in: run `gator register <name>` or `gator login <name>` first")]
    NotLoggedIn,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Feed not found: {0}")]
    FeedNotFound(String),

    #[error("User {0} does not follow any feeds")]
    NothingToFetch(String),

    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("Feed already exists: {0}")]
    FeedExists(String),

    #[error("{user} already follows {feed}")]
    AlreadyFollowing { user: String, feed: String },

    #[error("{user} does not follow {feed}")]
    NotFollowing { user: String, feed: String },

    #[error("Post already stored: {0}")]
    DuplicatePost(String),
}

impl Error {
    /// Whether the error reports a uniqueness conflict in the repository
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Error::UserExists(_)
                | Error::FeedExists(_)
                | Error::AlreadyFollowing { .. }
                | Error::DuplicatePost(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
