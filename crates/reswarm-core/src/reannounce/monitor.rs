//! The polling loop driving snapshots through the decision policy.

use std::collections::HashSet;
use std::future::Future;

use tracing::{debug, info, warn};

use crate::config::ReswarmConfig;
use crate::gateway::{Gateway, GatewayError, StatusClass};

use super::policy::Decision;
use super::{actuator, classify, policy, RetryLedger};

/// Long-running reannounce monitor over a connected gateway.
///
/// Owns the retry ledger and the iteration counter; both live exactly as
/// long as the process. All state mutation happens on this single task.
pub struct Monitor<G> {
    gateway: G,
    cfg: ReswarmConfig,
    ledger: RetryLedger,
    iteration: u64,
}

impl<G: Gateway> Monitor<G> {
    pub fn new(gateway: G, cfg: ReswarmConfig) -> Self {
        Self {
            gateway,
            cfg,
            ledger: RetryLedger::new(),
            iteration: 0,
        }
    }

    /// Run until `shutdown` resolves. The in-flight iteration always
    /// completes first; shutdown is only observed between iterations.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) {
        info!(
            interval_secs = self.cfg.interval_secs,
            process_seeding = self.cfg.process_seeding,
            "reannounce monitor started"
        );
        tokio::pin!(shutdown);
        loop {
            self.tick().await;
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested, stopping monitor");
                    return;
                }
                _ = tokio::time::sleep(self.cfg.interval()) => {}
            }
        }
    }

    /// One full iteration over the monitored status classes. A failure in
    /// one class is logged and never prevents the other from running, and
    /// never terminates the loop.
    pub async fn tick(&mut self) {
        self.iteration = self.iteration.wrapping_add(1);
        if let Err(err) = self.process_class(StatusClass::Downloading).await {
            warn!(class = %StatusClass::Downloading, %err, "iteration failed");
        }
        if self.cfg.process_seeding {
            if let Err(err) = self.process_class(StatusClass::Seeding).await {
                warn!(class = %StatusClass::Seeding, %err, "iteration failed");
            }
        }
    }

    async fn process_class(&mut self, class: StatusClass) -> Result<(), GatewayError> {
        let snapshots = self.gateway.snapshot(class).await?;

        let present: HashSet<&str> = snapshots.iter().map(|s| s.hash.as_str()).collect();
        self.ledger.sync(class, &present);

        for snap in &snapshots {
            let health = classify::classify(&snap.trackers);
            let attempts = self.ledger.attempts(class, &snap.hash);
            match policy::decide(class, snap, health, attempts, self.iteration, &self.cfg) {
                Decision::Act => {
                    actuator::apply(&self.gateway, &mut self.ledger, class, snap, health, &self.cfg)
                        .await;
                }
                Decision::Healthy => {
                    self.ledger.forget(class, &snap.hash);
                    debug!(name = %snap.name, progress = snap.progress, "tracker working");
                }
                Decision::HasPeers => {
                    debug!(
                        name = %snap.name,
                        peers = snap.peers(),
                        progress = snap.progress,
                        "swarm has peers, leaving it alone"
                    );
                }
                Decision::Waiting => {
                    debug!(
                        name = %snap.name,
                        active_secs = snap.time_active_secs,
                        "no peers, waiting out the duty cycle"
                    );
                }
                Decision::Exhausted => {
                    info!(
                        name = %snap.name,
                        attempts,
                        "reannounce attempts exhausted, giving up until it recovers"
                    );
                }
                Decision::TooOld => {
                    warn!(
                        name = %snap.name,
                        active_secs = snap.time_active_secs,
                        "inactive for too long, not reannouncing"
                    );
                }
            }
        }
        Ok(())
    }
}
