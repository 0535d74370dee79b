//! netmon — live network throughput chart in the terminal.
//!
//! Run with:  `RUST_LOG=info netmon`

use anyhow::Result;
use clap::Parser;
use netmon_config::{AdaptorSelector, NetmonConfig};
use netmon_monitor::MonitorSession;
use netmon_renderer::TerminalRenderer;
use netmon_system::SystemProvider;
use netmon_theme::Palette;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "netmon")]
#[command(about = "Live send/receive throughput for one network adaptor")]
struct Args {
    /// Path to netmon.toml (default: $XDG_CONFIG_HOME/netmon/netmon.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind the n-th counter source instead of the configured selector
    #[arg(short, long, conflicts_with = "auto")]
    adaptor: Option<usize>,

    /// Auto-detect the adaptor regardless of the config file
    #[arg(long)]
    auto: bool,

    /// Number of samples drawn per sparkline row
    #[arg(short, long, default_value = "60")]
    width: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging — RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("netmon v{} starting", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let path = args.config.clone().unwrap_or_else(netmon_config::default_path);
    let mut config = netmon_config::load_or_init(&path).unwrap_or_else(|e| {
        tracing::warn!("{e}; using defaults.");
        NetmonConfig::default()
    });

    if let Some(index) = args.adaptor {
        config.monitor.adaptor = AdaptorSelector::ExplicitIndex(index);
    } else if args.auto {
        config.monitor.adaptor = AdaptorSelector::AutoDetect;
    }

    let session = MonitorSession::new(config.monitor.clone(), Arc::new(SystemProvider::new()));
    session.subscribe(Arc::new(TerminalRenderer::stdout(
        Palette::from_config(&config.theme),
        args.width,
    )));

    let starter = {
        let session = session.clone();
        tokio::spawn(async move { session.start().await })
    };

    tokio::signal::ctrl_c().await?;
    session.stop().await;
    let final_state = starter.await?;
    tracing::info!("netmon exiting ({final_state})");

    Ok(())
}
