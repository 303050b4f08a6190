//! Per-class reannounce attempt bookkeeping.

use std::collections::{HashMap, HashSet};

use crate::gateway::StatusClass;

/// Attempt counts per torrent, scoped by status class.
///
/// Entries exist only for torrents that have been acted on during their
/// current presence streak in a class. `sync` reconciles the ledger with the
/// latest snapshot every iteration, which is what bounds the map as torrents
/// come and go; no other pruning is needed because the state is
/// process-lifetime only.
#[derive(Debug, Default)]
pub struct RetryLedger {
    classes: HashMap<StatusClass, HashMap<String, u32>>,
}

impl RetryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts recorded for a torrent (0 when untracked).
    pub fn attempts(&self, class: StatusClass, hash: &str) -> u32 {
        self.classes
            .get(&class)
            .and_then(|m| m.get(hash))
            .copied()
            .unwrap_or(0)
    }

    /// Record one more attempt for a torrent; returns the updated count.
    pub fn record(&mut self, class: StatusClass, hash: &str) -> u32 {
        let count = self
            .classes
            .entry(class)
            .or_default()
            .entry(hash.to_string())
            .or_insert(0);
        *count += 1;
        *count
    }

    /// Drop a single torrent: it recovered, so a relapse starts fresh.
    pub fn forget(&mut self, class: StatusClass, hash: &str) {
        if let Some(m) = self.classes.get_mut(&class) {
            m.remove(hash);
        }
    }

    /// Reconcile a class with its latest snapshot: an empty snapshot clears
    /// the whole class, otherwise entries for departed torrents are dropped.
    pub fn sync(&mut self, class: StatusClass, present: &HashSet<&str>) {
        let Some(m) = self.classes.get_mut(&class) else {
            return;
        };
        if present.is_empty() {
            m.clear();
        } else {
            m.retain(|hash, _| present.contains(hash.as_str()));
        }
    }

    /// Number of torrents tracked in a class.
    pub fn tracked(&self, class: StatusClass) -> usize {
        self.classes.get(&class).map_or(0, |m| m.len())
    }
}
