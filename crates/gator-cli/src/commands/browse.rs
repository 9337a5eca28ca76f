use std::io::Write;

use async_trait::async_trait;

use gator_core::models::User;
use gator_core::{Command, Error, Result, State, UserCommandHandler};

const DEFAULT_LIMIT: u32 = 2;
const DEFAULT_OFFSET: u32 = 0;
const USAGE: &str = "usage: browse [limit (default 2)] [offset (default 0)]";

/// `browse [limit] [offset]`: newest posts from the feeds the user follows
pub struct Browse;

#[async_trait]
impl UserCommandHandler for Browse {
    async fn handle(&self, state: &mut State, cmd: &Command, user: &User) -> Result<()> {
        let limit = parse_count(cmd.args.first(), DEFAULT_LIMIT)?;
        let offset = parse_count(cmd.args.get(1), DEFAULT_OFFSET)?;

        let posts = state.repo.list_posts(user.id, limit, offset).await?;
        if posts.is_empty() {
            writeln!(state.out, "No posts to show")?;
            return Ok(());
        }

        for post in &posts {
            write!(state.out, "{}\n{}\n\n", post.title, post.description)?;
        }

        Ok(())
    }
}

fn parse_count(arg: Option<&String>, default: u32) -> Result<u32> {
    match arg {
        None => Ok(default),
        Some(text) => text
            .trim()
            .parse()
            .map_err(|_| Error::Usage(format!("{}: '{}' is not a count", USAGE, text))),
    }
}
