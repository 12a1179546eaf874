//! Geobeacon - location beacon agent
//!
//! Main orchestration binary for the beacon.
//!
//! This binary ties together both halves of the agent:
//! - Periodic location reporting to the collection endpoint
//! - Persistent push channel listening for ping signals
//! - Audible alert playback when a ping addressed to this device arrives

use anyhow::Result;
use clap::Parser;
use geobeacon_alert::ClipPlayer;
use geobeacon_common::logging::{init_logging, LogConfig};
use geobeacon_common::AgentConfig;
use geobeacon_location::{GeoIpProbe, HttpReportSink, Reporter};
use geobeacon_push::{PushListener, WsConnector};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Geobeacon - location beacon agent
#[derive(Parser, Debug)]
#[command(
    name = "geobeacon",
    version = geobeacon_common::VERSION,
    about = "Geobeacon - location reporting and ping alert agent",
    long_about = None
)]
struct Args {
    /// Log directory (defaults to stdout)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Configuration file path
    ///
    /// If not specified, looks for config.toml in:
    /// 1. $CONFIGURATION_DIRECTORY (if set by systemd)
    /// 2. $XDG_CONFIG_HOME/geobeacon/ (if XDG_CONFIG_HOME is set)
    /// 3. ~/.config/geobeacon/
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the startup delay (for testing)
    #[arg(long)]
    no_startup_delay: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_config = LogConfig {
        log_dir: args.log_dir,
        level: args.log_level,
        json_format: cfg!(feature = "structured-logging"),
    };
    init_logging(log_config)?;

    info!("Geobeacon v{}", geobeacon_common::VERSION);

    let config_path = args.config.unwrap_or_else(geobeacon_common::config_file);
    debug!("Config file: {}", config_path.display());

    let config = if config_path.exists() {
        AgentConfig::from_file(&config_path)?
    } else {
        debug!(
            "Configuration file not found at {}, using defaults",
            config_path.display()
        );
        AgentConfig::default()
    };

    info!(
        serial = %config.device.serial_number,
        report_url = %config.endpoints.report_url,
        push_url = %config.endpoints.push_url,
        "agent configuration loaded"
    );

    // Shared shutdown signal, observed by both loops
    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, shutting down");
                signal_cancel.cancel();
            }
            Err(e) => error!("failed to listen for interrupt: {}", e),
        }
    });

    // Warm-up before the first probe/connect cycle, for hosts where the
    // network interface is still coming up at boot
    let startup_delay = config.timing.startup_delay();
    if !args.no_startup_delay && !startup_delay.is_zero() {
        info!(
            delay_secs = startup_delay.as_secs(),
            "waiting before first cycle"
        );
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(startup_delay) => {}
        }
    }
    if cancel.is_cancelled() {
        info!("shutdown requested during startup");
        return Ok(());
    }

    // Reporting loop runs as an independent background task; its failures
    // never reach the push listener
    let http_timeout = config.timing.http_timeout();
    let probe = GeoIpProbe::new(
        config.endpoints.lookup_url.clone(),
        config.device.serial_number.clone(),
        http_timeout,
    )?;
    let sink = HttpReportSink::new(config.endpoints.report_url.clone(), http_timeout)?;
    let reporter = Reporter::new(probe, sink, config.timing.report_interval());
    let reporter_cancel = cancel.clone();
    let reporter_task = tokio::spawn(async move { reporter.run(reporter_cancel).await });

    // Push listener drives its connect/reconnect cycle on the foreground path
    let player = ClipPlayer::new(config.alert.clip_path.clone(), config.timing.alert_duration());
    let connector = WsConnector::new(config.endpoints.push_url.clone());
    let listener = PushListener::new(
        connector,
        player,
        &config.device.serial_number,
        config.timing.reconnect_delay(),
    );
    listener.run(cancel.clone()).await;

    // The listener only exits on shutdown; the reporter observes the same
    // token within one interval
    if let Err(e) = reporter_task.await {
        error!("reporter task failed: {}", e);
    }

    info!("agent stopped");
    Ok(())
}
