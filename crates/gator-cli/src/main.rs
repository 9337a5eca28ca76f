use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gator_core::config::CONFIG_PATH_ENV;
use gator_core::feed::FeedFetcher;
use gator_core::storage::Database;
use gator_core::{AppConfig, Command, Commands, Session, State};

mod commands;

#[derive(Parser)]
#[command(name = "gator")]
#[command(author, version, about = "A command-line RSS feed aggregator")]
struct Cli {
    /// Configuration file (default: ~/.config/gator/config.toml)
    #[arg(long, env = CONFIG_PATH_ENV, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Command to run; `gator help` lists them
    command: Option<String>,

    /// Arguments passed to the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let registry = commands::registry();

    let Some(name) = cli.command else {
        bail!("not enough arguments: expected a command, run `gator help` to list them");
    };

    if name.eq_ignore_ascii_case("help") {
        print_help(&registry)?;
        return Ok(());
    }

    // Load configuration and the session it carries
    let path = cli.config.unwrap_or_else(AppConfig::default_path);
    let session = Session::load(&path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;

    init_logging(session.config());

    // Initialize database
    let database_url = session.config().database_url();
    let db = Database::connect(&database_url)
        .await
        .with_context(|| format!("failed to open database {}", database_url))?;
    let fetcher = FeedFetcher::new(&session.config().sync)?;

    let mut state = State {
        repo: Arc::new(db),
        fetcher: Arc::new(fetcher),
        session,
        out: Box::new(std::io::stdout()),
    };

    let cmd = Command::new(name, cli.args);
    registry.run(&mut state, &cmd).await?;
    state.out.flush()?;

    Ok(())
}

fn init_logging(config: &AppConfig) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn print_help(registry: &Commands) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    writeln!(out, "Usage: gator [--config <PATH>] <command> [args...]")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  help")?;
    for name in registry.names() {
        writeln!(out, "  {}", name)?;
    }
    Ok(())
}
