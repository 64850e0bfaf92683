use time::OffsetDateTime;
use tokio::{
    sync::watch,
    time::{Duration, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::heartbeat::{
    error::HeartbeatError, scheduler::HeartbeatScheduler, session::SessionSignal,
    types::CycleOutcome,
};

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub interval: Duration,
    pub run_after_significant_session: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3_600),
            run_after_significant_session: true,
        }
    }
}

/// Loop shell around the scheduler. One task, strictly sequential cycles:
/// a tick that fires while a cycle is still running is dropped by
/// `MissedTickBehavior::Skip`, never queued.
pub struct HeartbeatRunner {
    scheduler: HeartbeatScheduler,
    config: RunnerConfig,
}

impl HeartbeatRunner {
    pub fn new(scheduler: HeartbeatScheduler, config: RunnerConfig) -> Self {
        Self { scheduler, config }
    }

    pub async fn run(
        mut self,
        mut session_rx: watch::Receiver<SessionSignal>,
        shutdown: CancellationToken,
    ) -> Result<(), HeartbeatError> {
        self.scheduler.hydrate().await?;

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut session = *session_rx.borrow();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if session.active {
                        // Paused while the user is present; the tick is
                        // dropped, not deferred.
                        continue;
                    }
                    self.run_one(false).await;
                }
                changed = session_rx.changed() => {
                    if changed.is_err() {
                        // Session source gone; keep ticking as if inactive.
                        session = SessionSignal::default();
                        continue;
                    }
                    let next = *session_rx.borrow();
                    let session_ended = session.active && !next.active;
                    let was_significant = session.significant || next.significant;
                    session = next;
                    if session_ended
                        && was_significant
                        && self.config.run_after_significant_session
                    {
                        self.run_one(false).await;
                    }
                }
            }
        }

        Ok(())
    }

    async fn run_one(&mut self, session_active: bool) {
        match self
            .scheduler
            .run_cycle(OffsetDateTime::now_utc(), session_active)
            .await
        {
            Ok(CycleOutcome::Completed { record }) => {
                tracing::debug!(
                    target: "heartbeat",
                    cycle = record.number,
                    narrative = %record.narrative,
                    "cycle_recorded"
                );
            }
            Ok(CycleOutcome::Skipped { reason }) => {
                tracing::info!(target: "heartbeat", reason = %reason, "cycle_skipped");
            }
            Err(err) => {
                tracing::error!(target: "heartbeat", error = %err, "cycle_failed");
            }
        }
    }
}
