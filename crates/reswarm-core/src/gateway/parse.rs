//! WebUI API v2 response structures and their mapping to domain types.

use serde::Deserialize;

use super::types::{TorrentSnapshot, TrackerHealth, TrackerRecord};

/// One row of `GET /api/v2/torrents/info`.
#[derive(Debug, Deserialize)]
pub(super) struct WireTorrent {
    pub hash: String,
    pub name: String,
    #[serde(default)]
    pub time_active: i64,
    #[serde(default)]
    pub num_seeds: i64,
    #[serde(default)]
    pub num_leechs: i64,
    #[serde(default)]
    pub progress: f64,
}

impl WireTorrent {
    pub(super) fn into_snapshot(self, trackers: Vec<TrackerRecord>) -> TorrentSnapshot {
        TorrentSnapshot {
            hash: self.hash,
            name: self.name,
            time_active_secs: self.time_active.max(0) as u64,
            num_seeds: self.num_seeds.max(0) as u64,
            num_leechs: self.num_leechs.max(0) as u64,
            progress: self.progress.clamp(0.0, 1.0),
            trackers,
        }
    }
}

/// One row of `GET /api/v2/torrents/trackers`.
#[derive(Debug, Deserialize)]
pub(super) struct WireTracker {
    pub url: String,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub msg: String,
}

/// Message fragments trackers use when they have hard-rejected a torrent.
/// A status-4 tracker carrying one of these decodes as `Invalid` rather than
/// `NotWorking`, which gates the pause/resume remediation.
const REJECTION_HINTS: &[&str] = &[
    "unregistered",
    "not registered",
    "not found",
    "not exist",
    "info_hash",
    "infohash",
];

pub(super) fn decode_status(code: i64, msg: &str) -> TrackerHealth {
    match code {
        1 => TrackerHealth::NotContacted,
        2 => TrackerHealth::Working,
        3 => TrackerHealth::Updating,
        4 => {
            let lower = msg.to_ascii_lowercase();
            if REJECTION_HINTS.iter().any(|hint| lower.contains(hint)) {
                TrackerHealth::Invalid
            } else {
                TrackerHealth::NotWorking
            }
        }
        // 0 covers both "disabled" real trackers and the DHT/PeX/LSD rows.
        _ => TrackerHealth::Unsupported,
    }
}

pub(super) fn parse_torrents(body: &str) -> Result<Vec<WireTorrent>, serde_json::Error> {
    serde_json::from_str(body)
}

pub(super) fn parse_trackers(body: &str) -> Result<Vec<TrackerRecord>, serde_json::Error> {
    let rows: Vec<WireTracker> = serde_json::from_str(body)?;
    Ok(rows
        .into_iter()
        .map(|row| TrackerRecord {
            health: decode_status(row.status, &row.msg),
            url: row.url,
            message: row.msg,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torrents_info_parses() {
        let body = r#"[
            {"hash":"aa11","name":"debian-12.5.0-amd64-netinst.iso",
             "time_active":42,"num_seeds":0,"num_leechs":1,"progress":0.0,
             "state":"stalledDL","dlspeed":0}
        ]"#;
        let rows = parse_torrents(body).unwrap();
        assert_eq!(rows.len(), 1);
        let snap = rows.into_iter().next().unwrap().into_snapshot(Vec::new());
        assert_eq!(snap.hash, "aa11");
        assert_eq!(snap.time_active_secs, 42);
        assert_eq!(snap.peers(), 1);
        assert_eq!(snap.progress, 0.0);
    }

    #[test]
    fn negative_and_out_of_range_fields_are_clamped() {
        let body = r#"[{"hash":"bb22","name":"x","time_active":-1,
                        "num_seeds":-3,"num_leechs":0,"progress":1.2}]"#;
        let snap = parse_torrents(body)
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
            .into_snapshot(Vec::new());
        assert_eq!(snap.time_active_secs, 0);
        assert_eq!(snap.num_seeds, 0);
        assert_eq!(snap.progress, 1.0);
    }

    #[test]
    fn trackers_parse_including_synthetic_rows() {
        let body = r#"[
            {"url":"** [DHT] **","status":0,"msg":"","tier":""},
            {"url":"** [PeX] **","status":0,"msg":"","tier":""},
            {"url":"https://tracker.example.org/announce","status":2,"msg":"","tier":0}
        ]"#;
        let records = parse_trackers(body).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[0].is_synthetic());
        assert_eq!(records[0].health, TrackerHealth::Unsupported);
        assert!(!records[2].is_synthetic());
        assert_eq!(records[2].health, TrackerHealth::Working);
    }

    #[test]
    fn status_codes_decode() {
        assert_eq!(decode_status(1, ""), TrackerHealth::NotContacted);
        assert_eq!(decode_status(2, ""), TrackerHealth::Working);
        assert_eq!(decode_status(3, ""), TrackerHealth::Updating);
        assert_eq!(decode_status(4, "connection timed out"), TrackerHealth::NotWorking);
        assert_eq!(decode_status(0, ""), TrackerHealth::Unsupported);
        assert_eq!(decode_status(99, ""), TrackerHealth::Unsupported);
    }

    #[test]
    fn hard_rejections_decode_as_invalid() {
        assert_eq!(
            decode_status(4, "Unregistered torrent"),
            TrackerHealth::Invalid
        );
        assert_eq!(
            decode_status(4, "torrent not registered with this tracker"),
            TrackerHealth::Invalid
        );
        assert_eq!(
            decode_status(4, "info_hash not found"),
            TrackerHealth::Invalid
        );
    }
}
