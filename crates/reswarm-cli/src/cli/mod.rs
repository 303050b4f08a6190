//! CLI for the reswarm reannounce monitor.
//!
//! Single-purpose binary: connection flags plus overrides for the common
//! tuning knobs; everything else comes from the config file.

use anyhow::{Context, Result};
use clap::Parser;
use reswarm_core::config::{self, ReswarmConfig};
use reswarm_core::gateway::QbitGateway;
use reswarm_core::reannounce::Monitor;

/// Keep qBittorrent torrents announced while their swarms are struggling.
#[derive(Debug, Parser)]
#[command(name = "reswarm")]
#[command(about = "reswarm: tracker reannounce monitor for qBittorrent", long_about = None)]
pub struct Cli {
    /// qBittorrent WebUI host.
    #[arg(short = 's', long, default_value = "127.0.0.1", value_name = "HOST")]
    pub host: String,

    /// qBittorrent WebUI port.
    #[arg(short = 'p', long, default_value_t = 8080, value_name = "PORT")]
    pub port: u16,

    /// WebUI username (omit when the WebUI bypasses auth for localhost).
    #[arg(short = 'U', long, value_name = "USER")]
    pub username: Option<String>,

    /// WebUI password.
    #[arg(short = 'P', long, value_name = "PASS")]
    pub password: Option<String>,

    /// Also monitor freshly completed (seeding) torrents.
    #[arg(long)]
    pub process_seeding: bool,

    /// Seconds between polling iterations.
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Reannounce attempts per torrent before giving up.
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Skip the pause/resume cycle for hard-rejected trackers.
    #[arg(long)]
    pub no_remediate: bool,
}

impl Cli {
    /// File config with command-line overrides applied on top.
    fn effective_config(&self, mut cfg: ReswarmConfig) -> ReswarmConfig {
        if let Some(secs) = self.interval {
            cfg.interval_secs = secs;
        }
        if let Some(n) = self.max_attempts {
            cfg.max_attempts = n;
        }
        if self.process_seeding {
            cfg.process_seeding = true;
        }
        if self.no_remediate {
            cfg.remediate_invalid = false;
        }
        cfg
    }
}

pub async fn run_from_args() -> Result<()> {
    let cli = Cli::parse();
    let cfg = cli.effective_config(config::load_or_init()?);
    tracing::debug!("effective config: {:?}", cfg);

    // A gateway we cannot reach or log in to is fatal before the loop starts;
    // everything after this point is retried on the next iteration instead.
    let gateway = QbitGateway::connect(
        &cli.host,
        cli.port,
        cli.username.clone(),
        cli.password.clone(),
    )
    .await
    .with_context(|| format!("could not open a WebUI session at {}:{}", cli.host, cli.port))?;

    Monitor::new(gateway, cfg)
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await;
    Ok(())
}
