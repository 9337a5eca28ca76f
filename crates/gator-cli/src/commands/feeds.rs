use std::io::Write;

use async_trait::async_trait;

use gator_core::{Command, CommandHandler, Result, State};

const MIN_COLUMN_WIDTH: usize = 8;
const NAME_HEADER: &str = "Feed Name";
const USER_HEADER: &str = "User";

/// `feeds`: table of every feed with the user who added it
pub struct Feeds;

#[async_trait]
impl CommandHandler for Feeds {
    async fn handle(&self, state: &mut State, _cmd: &Command) -> Result<()> {
        let feeds = state.repo.list_feeds().await?;

        if feeds.is_empty() {
            writeln!(state.out, "No feeds yet.")?;
            writeln!(state.out, "\nTo add one, run:")?;
            writeln!(state.out, "  gator addfeed <name> <url>")?;
            return Ok(());
        }

        let mut rows = Vec::with_capacity(feeds.len());
        for feed in &feeds {
            let owner = state.repo.get_user_by_id(feed.user_id).await?;
            rows.push((feed.name.as_str(), owner.name, feed.url.as_str()));
        }

        let name_width = column_width(NAME_HEADER, rows.iter().map(|(name, _, _)| *name));
        let user_width = column_width(USER_HEADER, rows.iter().map(|(_, user, _)| user.as_str()));

        writeln!(
            state.out,
            "\n{:<name_width$} | {:<user_width$} | URL",
            NAME_HEADER, USER_HEADER
        )?;
        writeln!(state.out, "{}", "-".repeat(name_width + user_width + 11))?;
        for (name, user, url) in &rows {
            writeln!(state.out, "{:<name_width$} | {:<user_width$} | {}", name, user, url)?;
        }
        writeln!(state.out)?;

        Ok(())
    }
}

/// Widest of the header and the values, never narrower than 8
fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|value| value.chars().count())
        .fold(MIN_COLUMN_WIDTH.max(header.len()), usize::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::Harness;

    #[test]
    fn test_column_width_has_floor() {
        assert_eq!(column_width("User", ["a", "bb"].into_iter()), 8);
        assert_eq!(column_width("Feed Name", ["Blog"].into_iter()), 9);
        assert_eq!(column_width("User", ["Café Blog Ünïcode"].into_iter()), 17);
    }

    #[tokio::test]
    async fn test_feeds_table() {
        let mut h = Harness::new().await;
        h.run("register", &["alice"]).await.unwrap();
        h.run("addfeed", &["Blog", "http://example.com/rss"])
            .await
            .unwrap();
        h.run("register", &["bartholomew"]).await.unwrap();
        h.run("addfeed", &["News", "http://news.example/rss"])
            .await
            .unwrap();

        let output = h.run("feeds", &[]).await.unwrap();

        let expected = "\n\
            Feed Name | User        | URL\n\
            -------------------------------\n\
            Blog      | alice       | http://example.com/rss\n\
            News      | bartholomew | http://news.example/rss\n\
            \n";
        assert_eq!(output, expected);
    }

    #[tokio::test]
    async fn test_feeds_empty() {
        let mut h = Harness::new().await;

        let output = h.run("feeds", &[]).await.unwrap();
        assert!(output.starts_with("No feeds yet."));
    }
}
