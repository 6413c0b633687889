//! One billing and eviction sweep over every active session.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tracing::{info, warn};

use quotagate_core::config::EnforcerConfig;
use quotagate_core::result::AppResult;
use quotagate_core::types::BillingMonth;
use quotagate_service::QuotaService;

use crate::lease::{TickLease, claim_window};

/// Counters for one completed sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub window: u64,
    pub streams_scanned: usize,
    pub sessions_billed: usize,
    pub sessions_evicted: usize,
    pub orphans_pruned: usize,
    pub errors: usize,
    /// Set when the lease could not be renewed and the sweep stopped early.
    pub lease_lost: bool,
    pub duration: Duration,
}

/// Why a sweep did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another sweep holds the lease.
    LeaseHeld,
    /// This window was already billed.
    WindowClaimed,
}

/// Result of one call to [`Enforcer::run_cycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Completed(CycleReport),
    Skipped(SkipReason),
}

/// What happened to one session during a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionOutcome {
    Billed,
    Evicted,
    Orphan,
    Skipped,
}

/// Bills each active session `cost_per_tick` seconds per sweep and kicks
/// sessions whose balance reaches zero.
#[derive(Debug, Clone)]
pub struct Enforcer {
    service: QuotaService,
    config: EnforcerConfig,
}

impl Enforcer {
    pub fn new(service: QuotaService, config: EnforcerConfig) -> Self {
        Self { service, config }
    }

    pub fn config(&self) -> &EnforcerConfig {
        &self.config
    }

    /// Run one sweep billing the current month under `window`.
    ///
    /// The caller picks the window from its schedule (see
    /// [`crate::lease::next_window`]) so two deadlines one interval apart
    /// never share a window.
    pub async fn run_cycle(&self, window: u64) -> AppResult<CycleOutcome> {
        self.run_cycle_at(&BillingMonth::of(&Utc::now()), window).await
    }

    /// Run one sweep billing `month` under the given window index.
    pub async fn run_cycle_at(&self, month: &BillingMonth, window: u64) -> AppResult<CycleOutcome> {
        let store = Arc::clone(self.service.store());
        let Some(mut lease) = TickLease::acquire(store.clone(), self.config.lease_ttl()).await?
        else {
            return Ok(CycleOutcome::Skipped(SkipReason::LeaseHeld));
        };

        let claimed = claim_window(store.as_ref(), window, self.config.interval(), lease.owner())
            .await;
        match claimed {
            Ok(true) => {}
            Ok(false) => {
                release(lease).await;
                return Ok(CycleOutcome::Skipped(SkipReason::WindowClaimed));
            }
            Err(e) => {
                release(lease).await;
                return Err(e);
            }
        }

        let started = Instant::now();
        let mut report = CycleReport {
            window,
            ..CycleReport::default()
        };
        let swept = self.sweep(month, &mut lease, &mut report).await;
        release(lease).await;
        swept?;

        report.duration = started.elapsed();
        Ok(CycleOutcome::Completed(report))
    }

    async fn sweep(
        &self,
        month: &BillingMonth,
        lease: &mut TickLease,
        report: &mut CycleReport,
    ) -> AppResult<()> {
        let registry = self.service.registry();

        for stream_name in registry.active_streams().await? {
            report.streams_scanned += 1;

            let sessions = match registry.active_sessions(&stream_name).await {
                Ok(sessions) => sessions,
                Err(e) => {
                    warn!(stream_name = %stream_name, error = %e, "Failed to list sessions");
                    report.errors += 1;
                    continue;
                }
            };

            for session_id in sessions {
                if !lease.renew_if_due().await? {
                    warn!("Enforcer lease lost mid-sweep, stopping");
                    report.lease_lost = true;
                    return Ok(());
                }

                match self.bill_session(&stream_name, &session_id, month).await {
                    Ok(SessionOutcome::Billed) => report.sessions_billed += 1,
                    Ok(SessionOutcome::Evicted) => {
                        report.sessions_billed += 1;
                        report.sessions_evicted += 1;
                    }
                    Ok(SessionOutcome::Orphan) => report.orphans_pruned += 1,
                    Ok(SessionOutcome::Skipped) => {}
                    Err(e) => {
                        warn!(
                            stream_name = %stream_name,
                            session_id = %session_id,
                            error = %e,
                            "Failed to bill session"
                        );
                        report.errors += 1;
                    }
                }
            }
        }

        Ok(())
    }

    async fn bill_session(
        &self,
        stream_name: &str,
        session_id: &str,
        month: &BillingMonth,
    ) -> AppResult<SessionOutcome> {
        let registry = self.service.registry();
        let ledger = self.service.ledger();

        // No mapping: expired or a stop raced ahead of this sweep.
        let Some(token) = registry.token_for(session_id).await? else {
            if registry.prune_orphan(stream_name, session_id).await? {
                return Ok(SessionOutcome::Orphan);
            }
            // Re-admitted while being pruned; bill it next sweep.
            return Ok(SessionOutcome::Skipped);
        };

        match ledger
            .decrement_by(&token, month, self.config.cost_per_tick)
            .await?
        {
            Some(balance) if balance > 0 => return Ok(SessionOutcome::Billed),
            Some(balance) => {
                info!(stream_name, session_id, token = %token, balance, "Quota exhausted, evicting");
            }
            None => {
                // Admitted in an earlier month; the viewer must pass an
                // admission check for this one.
                info!(stream_name, session_id, token = %token, %month, "No quota for this month, evicting");
            }
        }

        self.service
            .evictions()
            .evict_now(stream_name, session_id)
            .await;
        registry.unregister(stream_name, session_id).await?;
        Ok(SessionOutcome::Evicted)
    }
}

async fn release(lease: TickLease) {
    match lease.release().await {
        Ok(true) => {}
        Ok(false) => warn!("Enforcer lease expired before release"),
        Err(e) => warn!(error = %e, "Failed to release enforcer lease"),
    }
}
