//! Executes an act decision against the gateway.

use tracing::{info, warn};

use crate::config::ReswarmConfig;
use crate::gateway::{Gateway, StatusClass, TorrentSnapshot};

use super::classify::TrackerHealthView;
use super::ledger::RetryLedger;

/// Carry out a reannounce for one torrent, recording the attempt first.
///
/// There is no confirmation channel, so a failed call still consumes an
/// attempt; the next snapshot decides what happens next. For a hard-rejected
/// torrent a pause/resume cycle runs before the reannounce (some trackers
/// only clear the rejection on a fresh session). Returns the updated count.
pub async fn apply<G: Gateway>(
    gateway: &G,
    ledger: &mut RetryLedger,
    class: StatusClass,
    snap: &TorrentSnapshot,
    health: TrackerHealthView,
    cfg: &ReswarmConfig,
) -> u32 {
    let attempt = ledger.record(class, &snap.hash);

    if health.invalid && cfg.remediate_invalid {
        warn!(
            name = %snap.name,
            active_secs = snap.time_active_secs,
            "tracker rejected torrent, pausing/resuming before reannounce"
        );
        if let Err(err) = gateway.pause(&snap.hash).await {
            warn!(name = %snap.name, %err, "pause failed");
        }
        if let Err(err) = gateway.resume(&snap.hash).await {
            warn!(name = %snap.name, %err, "resume failed");
        }
    }

    info!(
        name = %snap.name,
        active_secs = snap.time_active_secs,
        attempt,
        max_attempts = cfg.max_attempts,
        "reannouncing"
    );
    if let Err(err) = gateway.reannounce(&snap.hash).await {
        warn!(name = %snap.name, %err, "reannounce failed");
    }
    attempt
}
