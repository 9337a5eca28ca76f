pub mod auth;
pub mod command;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod scheduler;
pub mod session;
pub mod storage;

pub use command::{Command, CommandHandler, Commands, Handler, State, UserCommandHandler};
pub use config::AppConfig;
pub use error::{Error, Result};
pub use session::Session;
