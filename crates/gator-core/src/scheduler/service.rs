use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::feed::FetchFeed;
use crate::models::User;
use crate::storage::Repository;
use crate::{Error, Result};

use super::tasks::scrape_next_feed;

/// Parse a human interval such as "30s", "1m" or "1h 30m"; zero is rejected
pub fn parse_interval(text: &str) -> Result<Duration> {
    let interval = humantime::parse_duration(text.trim())
        .map_err(|_| Error::InvalidDuration(text.to_string()))?;

    if interval.is_zero() {
        return Err(Error::InvalidDuration(text.to_string()));
    }

    Ok(interval)
}

/// Runs ingestion cycles for one user on a fixed interval until shutdown
pub struct Scheduler {
    repo: Arc<dyn Repository>,
    fetcher: Arc<dyn FetchFeed>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(repo: Arc<dyn Repository>, fetcher: Arc<dyn FetchFeed>, interval: Duration) -> Self {
        Self {
            repo,
            fetcher,
            interval,
        }
    }

    /// Run cycles until `shutdown` flips to true, returning the number completed.
    ///
    /// The first cycle starts immediately. Cycles never overlap: a tick that
    /// comes due while a cycle is still running is dropped. Any cycle error
    /// stops the loop and is returned.
    pub async fn run<W>(
        &self,
        user: &User,
        mut shutdown: watch::Receiver<bool>,
        out: &mut W,
    ) -> Result<u64>
    where
        W: Write + Send + ?Sized,
    {
        if *shutdown.borrow() {
            return Ok(0);
        }

        info!(
            "Scheduler started for {}: every {}",
            user.name,
            humantime::format_duration(self.interval)
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut cycles = 0u64;

        loop {
            tokio::select! {
                biased;

                result = shutdown.changed() => {
                    // A dropped sender can never signal again
                    if result.is_err() || *shutdown.borrow() {
                        info!("Scheduler received shutdown signal");
                        break;
                    }
                }

                _ = ticker.tick() => {
                    debug!("Running ingestion cycle {}", cycles + 1);
                    match scrape_next_feed(self.repo.as_ref(), self.fetcher.as_ref(), user, out).await {
                        Ok(report) => {
                            cycles += 1;
                            debug!(feed = %report.feed_name, inserted = report.inserted, "Cycle finished");
                        }
                        Err(e) => {
                            error!("Ingestion cycle failed: {}", e);
                            return Err(e);
                        }
                    }
                }
            }
        }

        out.flush()?;
        info!("Scheduler stopped after {} cycles", cycles);
        Ok(cycles)
    }
}
