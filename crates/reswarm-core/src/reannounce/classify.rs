//! Tracker-set health classification.

use crate::gateway::{TrackerHealth, TrackerRecord};

/// Aggregate tracker health for one torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerHealthView {
    /// At least one real tracker confirmed the registration.
    pub working: bool,
    /// At least one real tracker hard-rejected the torrent.
    pub invalid: bool,
    /// Real trackers left after dropping the DHT/PeX/LSD placeholders.
    pub real_tracker_count: usize,
}

/// Classify a torrent's tracker set.
///
/// Synthetic peer-discovery rows never count towards health; an empty real
/// set is neither working nor invalid, which routes the torrent down the
/// conservative skip path.
pub fn classify(trackers: &[TrackerRecord]) -> TrackerHealthView {
    let mut working = false;
    let mut invalid = false;
    let mut real_tracker_count = 0usize;
    for tracker in trackers.iter().filter(|t| !t.is_synthetic()) {
        real_tracker_count += 1;
        match tracker.health {
            TrackerHealth::Working => working = true,
            TrackerHealth::Invalid => invalid = true,
            _ => {}
        }
    }
    TrackerHealthView {
        working,
        invalid,
        real_tracker_count,
    }
}
