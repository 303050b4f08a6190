//! Domain types shared between the gateway and the reannounce monitor.

use std::fmt;

/// Coarse lifecycle bucket used to query torrents from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Downloading,
    Seeding,
}

impl StatusClass {
    /// WebUI `filter=` value for this class.
    pub fn as_filter(self) -> &'static str {
        match self {
            StatusClass::Downloading => "downloading",
            StatusClass::Seeding => "seeding",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// Health of a single tracker as reported by the client.
///
/// Kept as a closed enum so every status the WebUI can report is handled
/// explicitly; `Invalid` is the hard-rejection case (tracker answered and
/// refused the torrent), distinct from a merely unreachable `NotWorking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerHealth {
    Working,
    NotContacted,
    Updating,
    NotWorking,
    Invalid,
    Unsupported,
}

/// One tracker row for a torrent.
#[derive(Debug, Clone)]
pub struct TrackerRecord {
    pub url: String,
    pub health: TrackerHealth,
    /// Last status message the tracker (or the client) produced.
    pub message: String,
}

impl TrackerRecord {
    /// DHT/PeX/LSD placeholder rows the WebUI lists alongside real trackers.
    /// They never count towards tracker health.
    pub fn is_synthetic(&self) -> bool {
        self.url.starts_with("** [")
    }
}

/// Immutable per-iteration view of one torrent.
#[derive(Debug, Clone)]
pub struct TorrentSnapshot {
    /// Stable torrent identifier (info-hash).
    pub hash: String,
    pub name: String,
    /// Seconds the torrent has been active.
    pub time_active_secs: u64,
    pub num_seeds: u64,
    pub num_leechs: u64,
    /// Completion fraction in [0, 1].
    pub progress: f64,
    pub trackers: Vec<TrackerRecord>,
}

impl TorrentSnapshot {
    /// Total connected peers (seeds + leeches).
    pub fn peers(&self) -> u64 {
        self.num_seeds + self.num_leechs
    }
}
