//! qBittorrent access: the `Gateway` contract the monitor drives, plus the
//! WebUI API implementation behind it.

mod parse;
mod qbit;
pub mod types;

pub use qbit::QbitGateway;
pub use types::{StatusClass, TorrentSnapshot, TrackerHealth, TrackerRecord};

use thiserror::Error;

/// Errors surfaced by the client gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("login rejected by qBittorrent (check username/password)")]
    LoginRejected,
    #[error("qBittorrent returned HTTP {0}")]
    Http(u32),
    #[error("transport error: {0}")]
    Transport(#[from] curl::Error),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Contract the reannounce monitor requires from the torrent client.
///
/// `snapshot` must reflect live data on every call, ordered by ascending
/// active time. The action calls are fire-and-forget: the monitor never waits
/// for an announce to improve anything, it re-evaluates from the next
/// snapshot.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    /// Torrents currently in the given status class, with their tracker sets.
    async fn snapshot(&self, class: StatusClass)
        -> Result<Vec<TorrentSnapshot>, GatewayError>;

    /// Request tracker re-registration for one torrent.
    async fn reannounce(&self, hash: &str) -> Result<(), GatewayError>;

    /// Pause one torrent. Used only as invalid-tracker remediation.
    async fn pause(&self, hash: &str) -> Result<(), GatewayError>;

    /// Resume one torrent. Used only as invalid-tracker remediation.
    async fn resume(&self, hash: &str) -> Result<(), GatewayError>;
}
