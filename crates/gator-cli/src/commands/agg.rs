use std::future::Future;
use std::io::{self, Write};

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, warn};

use gator_core::models::User;
use gator_core::scheduler::{parse_interval, Scheduler};
use gator_core::{Command, Result, State, UserCommandHandler};

/// `agg <interval>`: ingest followed feeds on a fixed interval until Ctrl-C
pub struct Agg;

#[async_trait]
impl UserCommandHandler for Agg {
    async fn handle(&self, state: &mut State, cmd: &Command, user: &User) -> Result<()> {
        let args = cmd.expect_args(1, "agg <interval>, e.g. agg 1m")?;
        let interval = parse_interval(&args[0])?;

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let signal = tokio::spawn(forward_interrupt(
            tokio::signal::ctrl_c(),
            shutdown_tx.clone(),
        ));

        writeln!(state.out, "Collecting feeds every {}", args[0].trim())?;
        writeln!(state.out, "Starting to fetch feeds. Stop using Ctrl-C")?;
        state.out.flush()?;

        let scheduler = Scheduler::new(state.repo.clone(), state.fetcher.clone(), interval);
        let result = scheduler.run(user, shutdown_rx, state.out.as_mut()).await;

        signal.abort();
        drop(shutdown_tx);

        let cycles = result?;
        writeln!(state.out, "Stopped after {} fetches", cycles)?;
        Ok(())
    }
}

/// Flip `shutdown` once `interrupt` fires; a listener that fails to install
/// leaves the scheduler running
async fn forward_interrupt<F>(interrupt: F, shutdown: watch::Sender<bool>)
where
    F: Future<Output = io::Result<()>>,
{
    match interrupt.await {
        Ok(()) => {
            info!("Received shutdown signal");
            let _ = shutdown.send(true);
        }
        Err(e) => warn!("Cannot listen for Ctrl-C, stop agg by killing the process: {}", e),
    }
}
