use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Monitor configuration loaded from `~/.config/reswarm/config.toml`.
///
/// Every field has a default, so a sparse (or absent) config file works.
/// Connection parameters are command-line only; this file holds the tuning
/// knobs of the reannounce loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReswarmConfig {
    /// Seconds to sleep between polling iterations.
    pub interval_secs: u64,
    /// Torrents active longer than this with zero progress are written off.
    pub max_age_secs: u64,
    /// Reannounce attempts per torrent before giving up.
    pub max_attempts: u32,
    /// A torrent younger than this always gets a nudge while no tracker works.
    pub peer_grace_secs: u64,
    /// Seeding torrents are only monitored for this long after completion.
    pub seeding_window_secs: u64,
    /// Throttling starts once a peerless torrent has been active this long.
    pub throttle_after_secs: u64,
    /// Once throttled, act on one iteration in this many.
    pub duty_cycle: u64,
    /// Also monitor freshly completed (seeding) torrents.
    pub process_seeding: bool,
    /// Pause/resume before reannouncing when a tracker hard-rejects a torrent.
    pub remediate_invalid: bool,
}

impl Default for ReswarmConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            max_age_secs: 3600,
            max_attempts: 18,
            peer_grace_secs: 60,
            seeding_window_secs: 300,
            throttle_after_secs: 120,
            duty_cycle: 2,
            process_seeding: false,
            remediate_invalid: true,
        }
    }
}

impl ReswarmConfig {
    /// Inter-iteration sleep as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("reswarm")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ReswarmConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ReswarmConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ReswarmConfig = toml::from_str(&data)?;
    Ok(cfg)
}
