//! Tracker reannounce monitoring.
//!
//! qBittorrent occasionally leaves a torrent stranded: its trackers were
//! never contacted, stopped answering, or hard-rejected the registration,
//! and the swarm never materializes. This module polls the client, classifies
//! each stalled torrent's tracker set, and issues bounded reannounce nudges
//! (with an optional pause/resume cycle for hard rejections) until the swarm
//! recovers or the attempt budget runs out.

mod actuator;
mod classify;
mod ledger;
mod monitor;
mod policy;

pub use classify::{classify, TrackerHealthView};
pub use ledger::RetryLedger;
pub use monitor::Monitor;
pub use policy::{decide, Decision};
