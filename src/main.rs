//! # RTL433 Reader
//!
//! Print the latest telemetry for the catalogued devices found in an
//! `rtl_433` JSON log, trimming the log after each query when enabled.
//!
//! Each query's snapshot is written to stdout as one JSON line; diagnostics
//! go to stderr (and optionally a daily rolling log file).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::json;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use rtl433_reader::config::Config;
use rtl433_reader::reader::RtlReader;
use rtl433_reader::scanner::TelemetrySnapshot;

/// Configuration file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// File name prefix of the rolling diagnostic log
const LOG_FILE_PREFIX: &str = "rtl433-reader.log";

/// Main entry point for the RTL433 reader
///
/// # Control Flow
///
/// 1. Load configuration from the first argument (or `config/default.toml`)
/// 2. Set up logging with a tracing subscriber
/// 3. Run a single query, or one query per `poll.interval_ms` until Ctrl+C
///
/// # Errors
///
/// Returns error if the configuration cannot be loaded, or if the query fails
/// in single-query mode. In poll mode a failed query is logged and the loop
/// continues.
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    let _guard = init_logging(&config)?;

    info!("RTL433 Reader v{} starting...", env!("CARGO_PKG_VERSION"));

    let reader = RtlReader::new(&config.reader.log_path, config.reader.trim)
        .with_catalog_path(&config.reader.catalog_path)
        .with_baseline(config.baseline());

    if config.poll.interval_ms == 0 {
        let snapshot = query(&reader).await?;
        println!("{}", render_report(&snapshot, Utc::now()));
        return Ok(());
    }

    let mut ticker = interval(Duration::from_millis(config.poll.interval_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Polling {} every {}ms", config.reader.log_path, config.poll.interval_ms);
    info!("Press Ctrl+C to exit");

    let mut query_count: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match query(&reader).await {
                    Ok(snapshot) => {
                        query_count += 1;
                        println!("{}", render_report(&snapshot, Utc::now()));
                    }
                    Err(e) => warn!("Telemetry query failed: {:#}", e),
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total successful queries: {}", query_count);
                break;
            }
        }
    }

    Ok(())
}

/// Run one query off the async runtime's worker threads
async fn query(reader: &RtlReader) -> Result<TelemetrySnapshot> {
    let reader = reader.clone();
    let snapshot = tokio::task::spawn_blocking(move || reader.get_telemetry())
        .await
        .context("Telemetry query task panicked")??;
    Ok(snapshot)
}

/// Install the stderr logger and, if configured, a daily rolling file logger
///
/// `RUST_LOG` overrides the configured level. The returned guard flushes the
/// file logger when dropped.
fn init_logging(config: &Config) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("Invalid log filter")?;

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = if config.logging.log_dir.is_empty() {
        (None, None)
    } else {
        let appender = tracing_appender::rolling::daily(&config.logging.log_dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer().with_ansi(false).with_writer(writer);
        (Some(layer), Some(guard))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Render one query result as a single JSON line
fn render_report(snapshot: &TelemetrySnapshot, timestamp: DateTime<Utc>) -> String {
    json!({
        "timestamp": timestamp.to_rfc3339(),
        "telemetry": snapshot,
    })
    .to_string()
}
