//! Enforcer runner: drives the sweep on a fixed interval until shutdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info};

use crate::enforcer::{CycleOutcome, Enforcer};
use crate::lease::{next_window, window_index};

/// Long-lived task calling [`Enforcer::run_cycle`] every interval.
///
/// Sweeps run on window boundaries counted from the Unix epoch and each one
/// bills the window of its scheduled deadline. Each cycle is awaited before
/// the next deadline is picked, so boundaries passed during a slow cycle
/// are skipped rather than replayed.
#[derive(Debug)]
pub struct EnforcerRunner {
    enforcer: Arc<Enforcer>,
    interval: Duration,
}

impl EnforcerRunner {
    pub fn new(enforcer: Arc<Enforcer>) -> Self {
        let interval = enforcer.config().interval();
        Self { enforcer, interval }
    }

    /// Run until the cancel signal flips to `true` or its sender is dropped.
    ///
    /// Cancellation is only observed between cycles.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            cost_per_tick = self.enforcer.config().cost_per_tick,
            "Enforcer started"
        );

        // The first sweep bills the window already in progress.
        let mut window = window_index(Utc::now().timestamp(), self.interval);
        self.tick(window).await;

        loop {
            let (next, delay) =
                next_window(Utc::now().timestamp_millis(), self.interval, Some(window));
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Enforcer received shutdown signal");
                        break;
                    }
                }
                _ = time::sleep(delay) => {
                    window = next;
                    self.tick(window).await;
                }
            }
        }

        info!("Enforcer stopped");
    }

    async fn tick(&self, window: u64) {
        match self.enforcer.run_cycle(window).await {
            Ok(CycleOutcome::Completed(report)) => {
                if report.sessions_evicted > 0 || report.errors > 0 || report.lease_lost {
                    info!(
                        window = report.window,
                        streams = report.streams_scanned,
                        billed = report.sessions_billed,
                        evicted = report.sessions_evicted,
                        orphans = report.orphans_pruned,
                        errors = report.errors,
                        lease_lost = report.lease_lost,
                        duration_ms = report.duration.as_millis() as u64,
                        "Enforcement cycle completed"
                    );
                } else {
                    debug!(
                        window = report.window,
                        streams = report.streams_scanned,
                        billed = report.sessions_billed,
                        orphans = report.orphans_pruned,
                        duration_ms = report.duration.as_millis() as u64,
                        "Enforcement cycle completed"
                    );
                }
            }
            Ok(CycleOutcome::Skipped(reason)) => {
                debug!(window, ?reason, "Enforcement cycle skipped");
            }
            Err(e) => {
                error!(error = %e, "Enforcement cycle failed");
            }
        }
    }
}
