use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

/// Counters for a scheduler lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub runs: u64,
    pub failures: u64,
}

/// Re-runs a job on a fixed cadence, isolating each run.
#[derive(Debug, Clone)]
pub struct Scheduler {
    every: Duration,
}

/// Shortest cadence accepted; a zero period would make the tokio interval panic.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

impl Scheduler {
    /// Intervals shorter than one millisecond are raised to one millisecond.
    pub fn new(every: Duration) -> Self {
        Self {
            every: every.max(MIN_INTERVAL),
        }
    }

    pub fn hourly() -> Self {
        Self::new(Duration::from_secs(60 * 60))
    }

    pub fn interval(&self) -> Duration {
        self.every
    }

    /// Runs the job a single time and hands back its result.
    pub async fn run_once<F, Fut>(&self, job: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        job().await
    }

    /// Runs the job now and then on every tick until `shutdown` resolves.
    ///
    /// Every run executes in its own task, so an error or a panic is logged
    /// and the next tick still fires. `shutdown` is only checked between
    /// runs; a run in progress is always allowed to finish.
    pub async fn run_forever<F, Fut, S>(&self, job: F, shutdown: S) -> SchedulerStats
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
        S: Future<Output = ()>,
    {
        info!("Starting scheduler, running every {:?}", self.every);

        let mut ticker = interval(self.every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut stats = SchedulerStats::default();

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, no further runs will be scheduled");
                    break;
                }
                _ = ticker.tick() => {}
            }

            stats.runs += 1;
            info!("Scheduled run {} starting", stats.runs);

            match tokio::spawn(job()).await {
                Ok(Ok(())) => info!("Scheduled run {} completed", stats.runs),
                Ok(Err(e)) => {
                    stats.failures += 1;
                    error!("Scheduled run {} failed: {:#}", stats.runs, e);
                }
                Err(e) => {
                    stats.failures += 1;
                    error!("Scheduled run {} aborted: {}", stats.runs, e);
                }
            }
        }

        info!(
            "Scheduler stopped after {} runs ({} failed)",
            stats.runs, stats.failures
        );
        stats
    }
}
