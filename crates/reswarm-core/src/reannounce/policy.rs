//! The decision policy: when to reannounce, when to wait, when to give up.

use crate::config::ReswarmConfig;
use crate::gateway::{StatusClass, TorrentSnapshot};

use super::classify::TrackerHealthView;

/// Outcome of evaluating one torrent in one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// A real tracker is working; leave the swarm alone.
    Healthy,
    /// Stalled past the age cutoff with zero progress; announcing is futile.
    TooOld,
    /// The swarm has peers or progress; trust it.
    HasPeers,
    /// Off-phase of the duty cycle; eligible again on a later iteration.
    Waiting,
    /// Attempt cap reached; skipped until the torrent leaves or recovers.
    Exhausted,
    /// Issue a reannounce now.
    Act,
}

/// Evaluate one torrent.
///
/// Pure: no side effects, identical inputs give identical outputs.
/// `attempts` is the ledger count for this torrent and `iteration` the
/// monitor's tick counter, which drives the duty-cycle throttle.
pub fn decide(
    class: StatusClass,
    snap: &TorrentSnapshot,
    health: TrackerHealthView,
    attempts: u32,
    iteration: u64,
    cfg: &ReswarmConfig,
) -> Decision {
    let elapsed = snap.time_active_secs;
    let peers = snap.peers();

    if health.working {
        return Decision::Healthy;
    }

    // A torrent that has been dead for over the age cap with nothing to show
    // will not be revived by another announce.
    if class == StatusClass::Downloading
        && elapsed > cfg.max_age_secs
        && (!health.working || peers == 0)
        && snap.progress == 0.0
    {
        return Decision::TooOld;
    }

    // Seeding torrents only matter in their early window after completion;
    // long-lived seeders are assumed fine whatever their trackers say.
    if class == StatusClass::Seeding && elapsed > cfg.seeding_window_secs {
        return Decision::Healthy;
    }

    // Inside the grace window a torrent with no working tracker always earns
    // a nudge. Past it, only a peerless, progressless torrent qualifies, and
    // the duty cycle limits how often it gets one.
    if elapsed >= cfg.peer_grace_secs {
        if peers > 0 || snap.progress > 0.0 {
            return Decision::HasPeers;
        }
        if elapsed >= cfg.throttle_after_secs && iteration % cfg.duty_cycle.max(1) != 0 {
            return Decision::Waiting;
        }
    }

    if attempts >= cfg.max_attempts {
        Decision::Exhausted
    } else {
        Decision::Act
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DL: StatusClass = StatusClass::Downloading;
    const SEED: StatusClass = StatusClass::Seeding;

    fn snap(elapsed: u64, seeds: u64, leechs: u64, progress: f64) -> TorrentSnapshot {
        TorrentSnapshot {
            hash: "aa11".to_string(),
            name: "torrent".to_string(),
            time_active_secs: elapsed,
            num_seeds: seeds,
            num_leechs: leechs,
            progress,
            trackers: Vec::new(),
        }
    }

    fn health(working: bool, invalid: bool) -> TrackerHealthView {
        TrackerHealthView {
            working,
            invalid,
            real_tracker_count: 1,
        }
    }

    #[test]
    fn working_tracker_always_wins() {
        // Even the worst possible stats never override a working tracker.
        let cfg = ReswarmConfig::default();
        let s = snap(10_000, 0, 0, 0.0);
        assert_eq!(
            decide(DL, &s, health(true, false), 0, 1, &cfg),
            Decision::Healthy
        );
        assert_eq!(
            decide(DL, &s, health(true, true), 17, 2, &cfg),
            Decision::Healthy
        );
    }

    #[test]
    fn too_old_short_circuits_the_ledger() {
        let cfg = ReswarmConfig::default();
        let s = snap(cfg.max_age_secs + 1, 0, 0, 0.0);
        for attempts in [0, 5, cfg.max_attempts] {
            assert_eq!(
                decide(DL, &s, health(false, false), attempts, 2, &cfg),
                Decision::TooOld
            );
        }
    }

    #[test]
    fn too_old_needs_zero_progress() {
        let cfg = ReswarmConfig::default();
        let s = snap(cfg.max_age_secs + 1, 0, 0, 0.4);
        assert_ne!(
            decide(DL, &s, health(false, false), 0, 2, &cfg),
            Decision::TooOld
        );
    }

    #[test]
    fn too_old_does_not_apply_to_seeding() {
        let cfg = ReswarmConfig::default();
        let s = snap(4000, 0, 0, 0.0);
        // Falls through to the seeding early-window rule instead.
        assert_eq!(
            decide(SEED, &s, health(false, false), 0, 2, &cfg),
            Decision::Healthy
        );
    }

    #[test]
    fn seeding_outside_window_is_left_alone() {
        let cfg = ReswarmConfig::default();
        let s = snap(400, 0, 0, 1.0);
        assert_eq!(
            decide(SEED, &s, health(false, true), 0, 2, &cfg),
            Decision::Healthy
        );
    }

    #[test]
    fn fresh_seeding_torrent_without_working_tracker_is_nudged() {
        let cfg = ReswarmConfig::default();
        let s = snap(30, 0, 0, 1.0);
        assert_eq!(
            decide(SEED, &s, health(false, false), 0, 2, &cfg),
            Decision::Act
        );
    }

    #[test]
    fn fresh_torrent_acts_regardless_of_peers() {
        let cfg = ReswarmConfig::default();
        let s = snap(10, 3, 2, 0.5);
        assert_eq!(
            decide(DL, &s, health(false, false), 0, 1, &cfg),
            Decision::Act
        );
    }

    #[test]
    fn peers_or_progress_mean_no_action() {
        let cfg = ReswarmConfig::default();
        assert_eq!(
            decide(DL, &snap(200, 1, 0, 0.0), health(false, false), 0, 2, &cfg),
            Decision::HasPeers
        );
        assert_eq!(
            decide(DL, &snap(200, 0, 0, 0.3), health(false, false), 0, 2, &cfg),
            Decision::HasPeers
        );
    }

    #[test]
    fn duty_cycle_throttles_old_peerless_torrents() {
        let cfg = ReswarmConfig::default();
        let s = snap(150, 0, 0, 0.0);
        // Odd iteration: off-phase.
        assert_eq!(
            decide(DL, &s, health(false, false), 0, 1, &cfg),
            Decision::Waiting
        );
        // Even iteration: acts.
        assert_eq!(
            decide(DL, &s, health(false, false), 0, 2, &cfg),
            Decision::Act
        );
    }

    #[test]
    fn throttle_only_starts_after_threshold() {
        let cfg = ReswarmConfig::default();
        let s = snap(cfg.throttle_after_secs - 1, 0, 0, 0.0);
        // Any parity acts below the threshold.
        assert_eq!(
            decide(DL, &s, health(false, false), 0, 1, &cfg),
            Decision::Act
        );
        assert_eq!(
            decide(DL, &s, health(false, false), 0, 2, &cfg),
            Decision::Act
        );
    }

    #[test]
    fn attempt_cap_exhausts() {
        let cfg = ReswarmConfig::default();
        let s = snap(10, 0, 0, 0.0);
        assert_eq!(
            decide(DL, &s, health(false, false), cfg.max_attempts - 1, 1, &cfg),
            Decision::Act
        );
        assert_eq!(
            decide(DL, &s, health(false, false), cfg.max_attempts, 1, &cfg),
            Decision::Exhausted
        );
        assert_eq!(
            decide(DL, &s, health(false, false), cfg.max_attempts + 3, 1, &cfg),
            Decision::Exhausted
        );
    }

    #[test]
    fn decide_is_pure() {
        let cfg = ReswarmConfig::default();
        let s = snap(150, 0, 0, 0.0);
        let h = health(false, false);
        let first = decide(DL, &s, h, 4, 7, &cfg);
        let second = decide(DL, &s, h, 4, 7, &cfg);
        assert_eq!(first, second);
    }

    #[test]
    fn zero_duty_cycle_does_not_panic() {
        let mut cfg = ReswarmConfig::default();
        cfg.duty_cycle = 0;
        let s = snap(150, 0, 0, 0.0);
        // Clamped to 1: every iteration is on-phase.
        assert_eq!(
            decide(DL, &s, health(false, false), 0, 3, &cfg),
            Decision::Act
        );
    }
}
